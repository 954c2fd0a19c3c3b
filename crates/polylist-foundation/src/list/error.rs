use super::type_registry::RendererTypeId;

/// Contract violations surfaced to the caller.
///
/// Validation rejections never show up here; they are reported through
/// [`Diagnostics`](super::Diagnostics) and treated as no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("position {position} is out of range for {size} items")]
    OutOfRange { position: usize, size: usize },

    #[error("no renderer type registered for {shape} at position {position}")]
    Unregistered { position: usize, shape: String },

    #[error("renderer type {type_id} has no binding")]
    UnknownRendererType { type_id: RendererTypeId },

    #[error("binding extra {key:?} was never stored")]
    MissingExtra { key: String },

    #[error("binding extra {key:?} holds a different type")]
    ExtraTypeMismatch { key: String },

    #[error("list adapter has been torn down")]
    TornDown,
}

pub type Result<T> = std::result::Result<T, ListError>;
