//! # Domain Layer
//!
//! Pure domain logic for the Conversion Metadata subsystem.
//! No I/O, no clocks other than the construction stamp, no async.
//!
//! ## Modules
//!
//! - `tristate` - Three-valued outcome flag (Unknown / True / False)
//! - `record` - The `Metadata` record and its equality rules
//! - `composite` - Codec for the `CpcProcessed_CreateDate` attribute
//! - `schema` - Per-field descriptor table (attribute names, encryption)
//! - `item` - Mapping between a record and its stored attribute map
//! - `config` - Subsystem configuration
//! - `errors` - Domain error types

pub mod composite;
pub mod config;
pub mod errors;
pub mod item;
pub mod record;
pub mod schema;
pub mod tristate;
