//! Error types and handling for the `MedAccess` service

use thiserror::Error;

use crate::geometry::GeometryError;

/// Main error type for the `MedAccess` service
#[derive(Error, Debug)]
pub enum AccessError {
    /// A queried collection has no entries
    #[error("Collection '{collection}' is empty")]
    EmptyCollection { collection: String },

    /// The classifier cannot proceed because a required collection is empty
    #[error("Insufficient data: {collection} collection is empty")]
    InsufficientData {
        collection: String,
        #[source]
        source: Option<GeometryError>,
    },

    /// Requested sports facility id is not in the lookup
    #[error("Unknown sports facility: {id}")]
    UnknownFacility { id: i64 },

    /// Malformed or missing request parameter
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// A computed distance was negative or non-finite
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Dataset loading errors
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AccessError {
    /// Create a new empty collection error
    pub fn empty_collection<S: Into<String>>(collection: S) -> Self {
        Self::EmptyCollection {
            collection: collection.into(),
        }
    }

    /// Create a new insufficient data error without an underlying geometry error
    pub fn insufficient_data<S: Into<String>>(collection: S) -> Self {
        Self::InsufficientData {
            collection: collection.into(),
            source: None,
        }
    }

    /// Create a new invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new invariant violation error
    pub fn invariant<S: Into<String>>(message: S) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the failure kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            AccessError::EmptyCollection { .. } => "empty_collection",
            AccessError::InsufficientData { .. } => "insufficient_data",
            AccessError::UnknownFacility { .. } => "unknown_facility",
            AccessError::InvalidRequest { .. } => "invalid_request",
            AccessError::InvariantViolation { .. } => "invariant_violation",
            AccessError::Config { .. } => "config",
            AccessError::Dataset { .. } => "dataset",
            AccessError::Io { .. } => "io",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AccessError::EmptyCollection { collection }
            | AccessError::InsufficientData { collection, .. } => {
                format!("No {collection} data is loaded, accessibility cannot be computed.")
            }
            AccessError::UnknownFacility { id } => {
                format!("Sports facility {id} was not found.")
            }
            AccessError::InvalidRequest { message } => format!("Invalid request: {message}"),
            AccessError::InvariantViolation { .. } => {
                "Internal error while computing distances.".to_string()
            }
            AccessError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            AccessError::Dataset { message } => format!("Dataset could not be loaded: {message}"),
            AccessError::Io { .. } => {
                "File operation failed. Please check file paths and permissions.".to_string()
            }
        }
    }
}

impl From<GeometryError> for AccessError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::EmptyCollection { collection } => AccessError::InsufficientData {
                collection: collection.clone(),
                source: Some(GeometryError::EmptyCollection { collection }),
            },
            GeometryError::InvariantViolation { message } => {
                AccessError::InvariantViolation { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AccessError::invalid_request("missing sport_id");
        assert!(matches!(err, AccessError::InvalidRequest { .. }));

        let err = AccessError::insufficient_data("medical");
        assert!(matches!(err, AccessError::InsufficientData { .. }));

        let err = AccessError::invariant("NaN distance");
        assert!(matches!(err, AccessError::InvariantViolation { .. }));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(AccessError::UnknownFacility { id: 1 }.kind(), "unknown_facility");
        assert_eq!(AccessError::insufficient_data("stops").kind(), "insufficient_data");
        assert_eq!(AccessError::empty_collection("stops").kind(), "empty_collection");
    }

    #[test]
    fn test_user_messages() {
        let err = AccessError::UnknownFacility { id: 999_999 };
        assert!(err.user_message().contains("999999"));

        let err = AccessError::invalid_request("sport_id must be an integer");
        assert!(err.user_message().contains("sport_id must be an integer"));
    }

    #[test]
    fn test_geometry_error_conversion() {
        let err: AccessError = GeometryError::EmptyCollection {
            collection: "stops".to_string(),
        }
        .into();
        match err {
            AccessError::InsufficientData { collection, source } => {
                assert_eq!(collection, "stops");
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err: AccessError = GeometryError::InvariantViolation {
            message: "negative".to_string(),
        }
        .into();
        assert!(matches!(err, AccessError::InvariantViolation { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AccessError = io_err.into();
        assert!(matches!(err, AccessError::Io { .. }));
    }
}
