mod binding;
mod lifecycle;
mod list_adapter;
mod notification;
mod spec;

pub use binding::{Holder, HolderRef, RendererBinding, ViewHolder};
pub use lifecycle::{LifecycleEvent, LifecycleObservers};
pub use list_adapter::ListAdapter;
pub use notification::{notify, NotificationSink};
pub use spec::AdapterSpec;
