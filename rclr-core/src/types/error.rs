//! Conversion error types.
//!
//! Each variant carries a stable `error_type()` string so host-interop layers can
//! match on the failure without parsing messages.

/// Errors raised while converting a host value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// A null value reached the strict conversion path.
    #[error("object to convert to R must not be a null reference")]
    NullArgument,

    /// No converter is registered for the exact type, or the converter declined.
    #[error("cannot yet expose type {type_name} as a SEXP")]
    UnsupportedType { type_name: String },

    /// A keyed collection whose value type has no registered array converter.
    #[error("cannot convert a keyed collection of type {type_name}")]
    UnsupportedCollection { type_name: String },

    /// The engine refused a request.
    #[error("engine error: {message}")]
    Engine { message: String },
}

impl ConvertError {
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        ConvertError::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        ConvertError::Engine {
            message: message.into(),
        }
    }

    /// Stable identifier for the failure kind.
    pub fn error_type(&self) -> &'static str {
        match self {
            ConvertError::NullArgument => "null_argument",
            ConvertError::UnsupportedType { .. } => "unsupported_type",
            ConvertError::UnsupportedCollection { .. } => "unsupported_collection",
            ConvertError::Engine { .. } => "engine_error",
        }
    }
}

/// Result alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
