//! # Conversion Metadata (cm-01)
//!
//! Tracks one document-conversion job: the submitted file, where its derived
//! artifacts live, and the outcome of conversion and validation.
//!
//! ## Composite Index Attribute
//!
//! The CPC+ secondary index is keyed on a single string that packs two
//! independent fields:
//!
//! ```text
//! cpc_processed ──┐
//!                 ├──→ "true#2017-12-08T18:32:54.846Z"
//! created_date ───┘
//! ```
//!
//! The record never stores that string. It is derived on every read of
//! [`Metadata::cpc_processed_create_date`] and split back into the two
//! source fields by [`Metadata::set_cpc_processed_create_date`].
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Creation Stamp | `created_date` is set at construction and never unset |
//! | 2 | Derived Composite | Composite attribute is a pure function of `cpc_processed` and `created_date` |
//! | 3 | Unknown Is Unencodable | No composite exists while `cpc_processed` is `Unknown` |
//! | 4 | Atomic Decode | A failing decode leaves both source fields untouched |
//! | 5 | Sensitive Fields | Only `Tin` and `FileName` are encrypted at rest |
//! | 6 | Canonical Equality | Equality and hash skip the composite and `is_test` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain logic (record, codec, schema, item mapping)
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `adapters/` - In-process implementations of the outbound ports
//! - `service.rs` - Application service implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use cm_01_conversion_metadata::{InMemoryMetadataService, MetadataApi, MetadataConfig, TriState};
//!
//! let service = InMemoryMetadataService::new_in_memory(MetadataConfig::default());
//!
//! let mut job = service.start_job();
//! job.conversion_status = TriState::True;
//! job.cpc_processed = TriState::False;
//!
//! let id = service.save(&mut job)?;
//! let loaded = service.load(&id)?;
//! assert_eq!(loaded, job);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use domain::composite::{DecodePolicy, COMPOSITE_DELIMITER};
pub use domain::config::MetadataConfig;
pub use domain::errors::{MetadataError, RepositoryError};
pub use domain::item::{AttributeValue, MetadataItem};
pub use domain::record::Metadata;
pub use domain::schema::{FieldDescriptor, KeyRole, MetadataSchema, METADATA_SCHEMA};
pub use domain::tristate::TriState;
pub use ports::inbound::MetadataApi;
pub use ports::outbound::{AttributeEncryptor, IdGenerator, MetadataRepository, TimeSource};
pub use service::{InMemoryMetadataService, MetadataDependencies, MetadataService};
