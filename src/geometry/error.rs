use thiserror::Error;

/// Errors raised by the geometry layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Collection '{collection}' is empty")]
    EmptyCollection { collection: String },

    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },
}

pub type Result<T> = std::result::Result<T, GeometryError>;
