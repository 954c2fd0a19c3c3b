use polylist_foundation::{Diagnostics, RESERVED_TYPE_LIMIT};

/// Configuration for a [`ListAdapter`](super::ListAdapter).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterSpec {
    /// Report rejected mutations as `warn` log records.
    pub diagnostics: bool,
    /// Largest value a caller-supplied classifier may return. Auto-assigned
    /// renderer types start right above it.
    pub reserved_type_limit: u32,
}

impl Default for AdapterSpec {
    fn default() -> Self {
        Self {
            diagnostics: false,
            reserved_type_limit: RESERVED_TYPE_LIMIT,
        }
    }
}

impl AdapterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn reserved_type_limit(mut self, limit: u32) -> Self {
        self.reserved_type_limit = limit;
        self
    }

    pub(crate) fn diagnostics_mode(&self) -> Diagnostics {
        if self.diagnostics {
            Diagnostics::enabled()
        } else {
            Diagnostics::silent()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_quiet_with_the_standard_limit() {
        let spec = AdapterSpec::new();
        assert!(!spec.diagnostics);
        assert_eq!(spec.reserved_type_limit, 100);
        assert!(!spec.diagnostics_mode().is_enabled());
    }

    #[test]
    fn builder_overrides_fields() {
        let spec = AdapterSpec::new().diagnostics(true).reserved_type_limit(10);
        assert_eq!(spec.reserved_type_limit, 10);
        assert!(spec.diagnostics_mode().is_enabled());
    }
}
