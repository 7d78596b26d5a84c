//! Error types for item construction

use thiserror::Error;

/// Result type for item operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building an item
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A mutating call arrived before the item was initialized
    #[error("The item must be initialized before it can be modified")]
    ItemNotInitialized,

    /// A representation for an overlapping body shape already exists
    #[error("The item already contains a representation for the {0} body shape")]
    DuplicateRepresentation(String),

    /// Name or description contains a character that would corrupt the
    /// item metadata
    #[error("Invalid metadata text: {text:?} contains a reserved character")]
    InvalidMetadataText { text: String },

    /// Body shape string outside the known set
    #[error("Unknown body shape: {0}")]
    UnknownBodyShape(String),
}

impl Error {
    /// Create a duplicate representation error for a body shape
    pub fn duplicate_representation(shape: &str) -> Self {
        Error::DuplicateRepresentation(shape.to_string())
    }

    /// Create an invalid metadata text error
    pub fn invalid_metadata_text<S: Into<String>>(text: S) -> Self {
        Error::InvalidMetadataText { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_structured_data() {
        let err = Error::duplicate_representation("male");
        assert!(err.to_string().contains("male"));

        let err = Error::invalid_metadata_text("a:b");
        assert!(matches!(err, Error::InvalidMetadataText { .. }));
        assert!(err.to_string().contains("a:b"));
    }
}
