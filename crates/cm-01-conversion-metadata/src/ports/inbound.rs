//! # Inbound Ports (Driving Ports)
//!
//! The API the Conversion Metadata service offers to its callers.

use crate::domain::errors::RepositoryError;
use crate::domain::record::Metadata;

/// Lifecycle operations on conversion metadata.
pub trait MetadataApi {
    /// Begin tracking a new conversion job.
    ///
    /// The record is stamped with the current instant and has no `id` yet.
    fn start_job(&self) -> Metadata;

    /// Persist a record.
    ///
    /// Assigns `id` when absent and returns it. Classified attributes are
    /// encrypted before they reach the repository.
    fn save(&self, metadata: &mut Metadata) -> Result<String, RepositoryError>;

    /// Load a record by identifier.
    fn load(&self, id: &str) -> Result<Metadata, RepositoryError>;

    /// Records whose CPC+ processed flag equals `processed`, oldest first.
    ///
    /// Records with an unknown processed flag have no composite attribute
    /// and are never returned. Items that fail to decode are logged and
    /// skipped; [`MetadataApi::load`] surfaces their errors.
    fn find_by_cpc_processed(&self, processed: bool) -> Result<Vec<Metadata>, RepositoryError>;
}
