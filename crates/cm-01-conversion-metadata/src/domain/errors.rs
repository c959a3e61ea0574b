//! # Domain Errors
//!
//! Error types for the Conversion Metadata subsystem.
//!
//! ## Design Principles
//!
//! - Each error names the attribute or raw value that caused it
//! - Decode failures are per-record, never fatal to the process
//! - No panics in domain logic (use Result instead)

use thiserror::Error;

/// Errors raised by the record, the composite codec and the item mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// Second composite field is not a strict ISO-8601 UTC instant.
    #[error("Malformed timestamp: {value:?} is not an ISO-8601 UTC instant")]
    MalformedTimestamp { value: String },

    /// First composite field is neither `true` nor `false`.
    #[error("Malformed processed flag: {value:?} is not `true` or `false`")]
    MalformedProcessedFlag { value: String },

    /// Composite split into fewer than two fields (strict decoding only).
    #[error("Incomplete composite: {value:?} does not contain two `#`-separated fields")]
    IncompleteComposite { value: String },

    /// A required attribute is absent from a stored item.
    #[error("Missing attribute: {attribute}")]
    MissingAttribute { attribute: &'static str },

    /// A stored attribute has the wrong type or an unparseable value.
    #[error("Attribute {attribute} has an unexpected type, expected {expected}")]
    AttributeType {
        attribute: &'static str,
        expected: &'static str,
    },
}

/// Errors surfaced by the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No item stored under this identifier.
    #[error("Metadata not found: {id}")]
    NotFound { id: String },

    /// Backing store failure.
    #[error("Repository backend error: {message}")]
    Backend { message: String },

    /// Encrypting or decrypting a classified attribute failed.
    #[error("Encryption error on attribute {attribute}: {message}")]
    Encryption { attribute: String, message: String },

    /// Stored item could not be turned back into a record.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
