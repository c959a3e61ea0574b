//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the Conversion Metadata service.
//!
//! These are the interfaces the host application implements. The crate
//! ships in-process adapters for each in `adapters/`.

use chrono::{DateTime, Utc};

use crate::domain::errors::RepositoryError;
use crate::domain::item::MetadataItem;

/// Abstract interface for the metadata table.
///
/// Production: a key-value store client owned by the host
/// Testing: `InMemoryMetadataRepository`
pub trait MetadataRepository: Send + Sync {
    /// Write an item under its identifier, replacing any previous item.
    fn put_item(&self, id: &str, item: MetadataItem) -> Result<(), RepositoryError>;

    /// Read the item stored under an identifier.
    fn get_item(&self, id: &str) -> Result<Option<MetadataItem>, RepositoryError>;

    /// Every stored item.
    fn scan(&self) -> Result<Vec<MetadataItem>, RepositoryError>;
}

/// Source of new record identifiers.
pub trait IdGenerator: Send + Sync {
    /// A fresh, unique identifier.
    fn next_id(&self) -> String;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Encryption of classified attributes.
///
/// The algorithm belongs to the host. The service only decides which
/// attributes pass through here.
pub trait AttributeEncryptor: Send + Sync {
    /// Encrypt one attribute value.
    fn encrypt(&self, attribute: &str, plaintext: &str) -> Result<String, RepositoryError>;

    /// Decrypt one attribute value.
    fn decrypt(&self, attribute: &str, ciphertext: &str) -> Result<String, RepositoryError>;
}
