//! Testing utilities and harness for polylist

pub mod cursor;
pub mod samples;
pub mod sink;
pub mod test_rule;

pub use test_rule::*;

pub mod prelude {
    pub use crate::cursor::{CursorProbe, FakeCursor};
    pub use crate::samples::*;
    pub use crate::sink::{Notification, RecordingSink};
    pub use crate::test_rule::AdapterTestRule;
}
