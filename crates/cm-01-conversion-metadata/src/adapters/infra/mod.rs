//! Infrastructure Adapters
//!
//! Clock, identifier and encryption implementations.

mod encryptor;
mod id;
mod time;

pub use encryptor::PassthroughEncryptor;
pub use id::UuidIdGenerator;
pub use time::SystemTimeSource;
