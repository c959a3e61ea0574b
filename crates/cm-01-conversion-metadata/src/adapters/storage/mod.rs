//! Storage Adapters
//!
//! Implementations of the `MetadataRepository` trait.

mod memory;

pub use memory::InMemoryMetadataRepository;
