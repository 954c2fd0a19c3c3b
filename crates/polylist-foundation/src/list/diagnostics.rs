//! Suppressible diagnostics for rejected mutations.

use std::fmt;

/// `log` target used by every polylist crate.
pub const LOG_TARGET: &str = "polylist";

/// Switch for validation-rejection warnings.
///
/// Rejected mutations (bad index, unregistered record, empty range) are
/// no-ops, not errors. When enabled they are reported as `warn` records on
/// [`LOG_TARGET`]; when disabled they are silent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    enabled: bool,
}

impl Diagnostics {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn silent() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Reports that `operation` was rejected.
    pub fn reject(&self, operation: &str, reason: fmt::Arguments<'_>) {
        if self.enabled {
            log::warn!(target: LOG_TARGET, "{}: {}", operation, reason);
        }
    }
}
