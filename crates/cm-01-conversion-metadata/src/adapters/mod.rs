//! # Adapters
//!
//! In-process implementations of the outbound ports.
//!
//! - `storage` - Metadata repositories
//! - `infra` - Clock, identifier and encryption adapters

pub mod infra;
pub mod storage;

pub use infra::{PassthroughEncryptor, SystemTimeSource, UuidIdGenerator};
pub use storage::InMemoryMetadataRepository;
