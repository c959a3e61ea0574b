//! # Conversion Metadata Service
//!
//! The main service implementing the Metadata API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Stamps new records from the injected `TimeSource`
//! 2. Assigns identifiers on first save
//! 3. Encrypts exactly the attributes the schema classifies as sensitive
//! 4. Decodes the composite attribute on load under the configured policy

use crate::adapters::{
    InMemoryMetadataRepository, PassthroughEncryptor, SystemTimeSource, UuidIdGenerator,
};
use crate::domain::composite::{self, DecodePolicy};
use crate::domain::config::MetadataConfig;
use crate::domain::errors::RepositoryError;
use crate::domain::item::{AttributeValue, MetadataItem};
use crate::domain::record::Metadata;
use crate::domain::schema::{attributes, METADATA_SCHEMA};
use crate::ports::inbound::MetadataApi;
use crate::ports::outbound::{AttributeEncryptor, IdGenerator, MetadataRepository, TimeSource};

/// Dependencies for MetadataService
pub struct MetadataDependencies<R, I, T, E> {
    pub repository: R,
    pub id_generator: I,
    pub time_source: T,
    pub encryptor: E,
}

/// The Conversion Metadata Service.
pub struct MetadataService<R, I, T, E>
where
    R: MetadataRepository,
    I: IdGenerator,
    T: TimeSource,
    E: AttributeEncryptor,
{
    /// Backing table.
    pub(crate) repository: R,
    /// Identifier source for first saves.
    pub(crate) id_generator: I,
    /// Clock for new records.
    pub(crate) time_source: T,
    /// Encryption for classified attributes.
    pub(crate) encryptor: E,
    /// Service configuration.
    pub(crate) config: MetadataConfig,
}

/// Service wired to the in-process adapters.
pub type InMemoryMetadataService = MetadataService<
    InMemoryMetadataRepository,
    UuidIdGenerator,
    SystemTimeSource,
    PassthroughEncryptor,
>;

impl InMemoryMetadataService {
    /// Create a service backed by an in-memory table.
    pub fn new_in_memory(config: MetadataConfig) -> Self {
        Self::new(
            MetadataDependencies {
                repository: InMemoryMetadataRepository::new(),
                id_generator: UuidIdGenerator,
                time_source: SystemTimeSource,
                encryptor: PassthroughEncryptor,
            },
            config,
        )
    }
}

impl<R, I, T, E> MetadataService<R, I, T, E>
where
    R: MetadataRepository,
    I: IdGenerator,
    T: TimeSource,
    E: AttributeEncryptor,
{
    /// Create a new service with the given dependencies.
    pub fn new(deps: MetadataDependencies<R, I, T, E>, config: MetadataConfig) -> Self {
        tracing::debug!(
            table = %config.table_name,
            policy = ?config.decode_policy,
            "[cm-01] Metadata service created"
        );
        Self {
            repository: deps.repository,
            id_generator: deps.id_generator,
            time_source: deps.time_source,
            encryptor: deps.encryptor,
            config,
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// The backing repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn seal(&self, item: &mut MetadataItem) -> Result<(), RepositoryError> {
        for attribute in METADATA_SCHEMA.encrypted_attributes() {
            if let Some(AttributeValue::S(value)) = item.get_mut(attribute) {
                *value = self.encryptor.encrypt(attribute, value)?;
            }
        }
        Ok(())
    }

    fn unseal(&self, item: &mut MetadataItem) -> Result<(), RepositoryError> {
        for attribute in METADATA_SCHEMA.encrypted_attributes() {
            if let Some(AttributeValue::S(value)) = item.get_mut(attribute) {
                *value = self.encryptor.decrypt(attribute, value)?;
            }
        }
        Ok(())
    }

    fn rebuild(&self, mut item: MetadataItem) -> Result<Metadata, RepositoryError> {
        self.unseal(&mut item)?;

        if self.config.decode_policy == DecodePolicy::Lenient {
            if let Some(combined) = item
                .get(attributes::CPC_PROCESSED_CREATE_DATE)
                .and_then(AttributeValue::as_s)
            {
                if matches!(composite::decode(combined, DecodePolicy::Lenient), Ok(None)) {
                    tracing::warn!(
                        value = combined,
                        "[cm-01] Skipping incomplete CpcProcessed_CreateDate attribute"
                    );
                }
            }
        }

        Ok(Metadata::from_item(&item, self.config.decode_policy)?)
    }
}

impl<R, I, T, E> MetadataApi for MetadataService<R, I, T, E>
where
    R: MetadataRepository,
    I: IdGenerator,
    T: TimeSource,
    E: AttributeEncryptor,
{
    fn start_job(&self) -> Metadata {
        Metadata::with_created_date(self.time_source.now())
    }

    fn save(&self, metadata: &mut Metadata) -> Result<String, RepositoryError> {
        let id = match &metadata.id {
            Some(id) => id.clone(),
            None => {
                let id = self.id_generator.next_id();
                metadata.id = Some(id.clone());
                id
            }
        };

        let mut item = metadata.to_item();
        self.seal(&mut item)?;
        self.repository.put_item(&id, item)?;

        tracing::info!(
            id = %id,
            table = %self.config.table_name,
            cpc = metadata.is_cpc(),
            "[cm-01] Saved conversion metadata"
        );
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<Metadata, RepositoryError> {
        let item = self
            .repository
            .get_item(id)?
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })?;

        let metadata = self.rebuild(item)?;
        tracing::debug!(id, "[cm-01] Loaded conversion metadata");
        Ok(metadata)
    }

    fn find_by_cpc_processed(&self, processed: bool) -> Result<Vec<Metadata>, RepositoryError> {
        let prefix = format!("{}{}", processed, composite::COMPOSITE_DELIMITER);

        let mut found = self
            .repository
            .scan()?
            .into_iter()
            .filter(|item| {
                item.get(attributes::CPC_PROCESSED_CREATE_DATE)
                    .and_then(AttributeValue::as_s)
                    .is_some_and(|combined| combined.starts_with(&prefix))
            })
            .filter_map(|item| {
                let uuid = item
                    .get(attributes::UUID)
                    .and_then(AttributeValue::as_s)
                    .map(str::to_string);
                match self.rebuild(item) {
                    Ok(metadata) => Some(metadata),
                    Err(e) => {
                        tracing::warn!(
                            uuid = uuid.as_deref().unwrap_or("<none>"),
                            error = %e,
                            "[cm-01] Skipping undecodable item in CPC+ lookup"
                        );
                        None
                    }
                }
            })
            .collect::<Vec<_>>();

        found.sort_by(|a, b| a.created_date.cmp(&b.created_date));

        tracing::debug!(
            processed,
            count = found.len(),
            "[cm-01] CPC+ processed lookup"
        );
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tristate::TriState;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use parking_lot::Mutex;

    struct FixedClock(Mutex<DateTime<Utc>>);

    impl FixedClock {
        fn at(instant: DateTime<Utc>) -> Self {
            Self(Mutex::new(instant))
        }
    }

    impl TimeSource for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            let mut now = self.0.lock();
            let current = *now;
            *now = current + Duration::seconds(1);
            current
        }
    }

    struct SequentialIds(Mutex<u32>);

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            let mut next = self.0.lock();
            *next += 1;
            format!("job-{}", *next)
        }
    }

    /// Marks ciphertext so tests can see which attributes were sealed.
    struct TaggingEncryptor;

    impl AttributeEncryptor for TaggingEncryptor {
        fn encrypt(&self, attribute: &str, plaintext: &str) -> Result<String, RepositoryError> {
            Ok(format!("enc:{attribute}:{plaintext}"))
        }

        fn decrypt(&self, attribute: &str, ciphertext: &str) -> Result<String, RepositoryError> {
            ciphertext
                .strip_prefix(&format!("enc:{attribute}:"))
                .map(str::to_string)
                .ok_or_else(|| RepositoryError::Encryption {
                    attribute: attribute.to_string(),
                    message: "missing tag".to_string(),
                })
        }
    }

    type TestService =
        MetadataService<InMemoryMetadataRepository, SequentialIds, FixedClock, TaggingEncryptor>;

    fn start_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 12, 8, 18, 32, 54).unwrap()
    }

    fn service_with(config: MetadataConfig) -> TestService {
        MetadataService::new(
            MetadataDependencies {
                repository: InMemoryMetadataRepository::new(),
                id_generator: SequentialIds(Mutex::new(0)),
                time_source: FixedClock::at(start_instant()),
                encryptor: TaggingEncryptor,
            },
            config,
        )
    }

    fn service() -> TestService {
        service_with(MetadataConfig::default())
    }

    #[test]
    fn test_start_job_uses_time_source() {
        let service = service();
        let job = service.start_job();

        assert_eq!(job.created_date, start_instant());
        assert_eq!(job.id, None);
        assert_eq!(job.cpc_processed, TriState::Unknown);
    }

    #[test]
    fn test_save_assigns_id_once() {
        let service = service();
        let mut job = service.start_job();

        let first = service.save(&mut job).unwrap();
        assert_eq!(first, "job-1");
        assert_eq!(job.id.as_deref(), Some("job-1"));

        let second = service.save(&mut job).unwrap();
        assert_eq!(second, "job-1");
        assert_eq!(service.repository().len(), 1);
    }

    #[test]
    fn test_save_encrypts_only_classified_attributes() {
        let service = service();
        let mut job = service.start_job();
        job.tin = Some("000777777".to_string());
        job.npi = Some("0876543210".to_string());
        job.file_name = Some("file.xml".to_string());

        let id = service.save(&mut job).unwrap();
        let stored = service.repository().get_item(&id).unwrap().unwrap();

        assert_eq!(
            stored.get("Tin"),
            Some(&AttributeValue::S("enc:Tin:000777777".to_string()))
        );
        assert_eq!(
            stored.get("FileName"),
            Some(&AttributeValue::S("enc:FileName:file.xml".to_string()))
        );
        assert_eq!(
            stored.get("Npi"),
            Some(&AttributeValue::S("0876543210".to_string()))
        );
    }

    #[test]
    fn test_load_round_trips_record() {
        let service = service();
        let mut job = service.start_job();
        job.tin = Some("000777777".to_string());
        job.file_name = Some("file.xml".to_string());
        job.conversion_status = TriState::True;
        job.validation_status = TriState::False;
        job.cpc_program_tag = Some("CPC_2".to_string());
        job.cpc_processed = TriState::False;

        let id = service.save(&mut job).unwrap();
        let loaded = service.load(&id).unwrap();

        assert_eq!(loaded, job);
        assert_eq!(loaded.tin.as_deref(), Some("000777777"));
    }

    #[test]
    fn test_load_missing_id() {
        let service = service();
        assert_eq!(
            service.load("nope"),
            Err(RepositoryError::NotFound {
                id: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_load_surfaces_decode_errors() {
        let service = service();
        let mut job = service.start_job();
        let id = service.save(&mut job).unwrap();

        let mut item = service.repository().get_item(&id).unwrap().unwrap();
        item.insert(
            "CpcProcessed_CreateDate".to_string(),
            AttributeValue::S("true#not-a-timestamp".to_string()),
        );
        service.repository().put_item(&id, item).unwrap();

        assert!(matches!(
            service.load(&id),
            Err(RepositoryError::Metadata(
                crate::MetadataError::MalformedTimestamp { .. }
            ))
        ));
    }

    #[test]
    fn test_strict_policy_rejects_incomplete_composite_on_load() {
        let service = service_with(MetadataConfig::new().with_decode_policy(DecodePolicy::Strict));
        let mut job = service.start_job();
        let id = service.save(&mut job).unwrap();

        let mut item = service.repository().get_item(&id).unwrap().unwrap();
        item.insert(
            "CpcProcessed_CreateDate".to_string(),
            AttributeValue::S("true".to_string()),
        );
        service.repository().put_item(&id, item).unwrap();

        assert!(matches!(
            service.load(&id),
            Err(RepositoryError::Metadata(
                crate::MetadataError::IncompleteComposite { .. }
            ))
        ));
    }

    #[test]
    fn test_find_by_cpc_processed_orders_by_creation() {
        let service = service();

        let mut saved = Vec::new();
        for processed in [TriState::False, TriState::True, TriState::False, TriState::Unknown] {
            let mut job = service.start_job();
            job.cpc_program_tag = Some("CPC_1".to_string());
            job.cpc_processed = processed;
            service.save(&mut job).unwrap();
            saved.push(job);
        }

        let unprocessed = service.find_by_cpc_processed(false).unwrap();
        assert_eq!(unprocessed, vec![saved[0].clone(), saved[2].clone()]);

        let processed = service.find_by_cpc_processed(true).unwrap();
        assert_eq!(processed, vec![saved[1].clone()]);
    }

    #[test]
    fn test_find_by_cpc_processed_skips_undecodable_items() {
        let service = service();

        let mut good = service.start_job();
        good.cpc_processed = TriState::False;
        service.save(&mut good).unwrap();

        let mut bad = service.start_job();
        bad.cpc_processed = TriState::False;
        let bad_id = service.save(&mut bad).unwrap();

        let mut item = service.repository().get_item(&bad_id).unwrap().unwrap();
        item.insert(
            "CpcProcessed_CreateDate".to_string(),
            AttributeValue::S("false#garbage".to_string()),
        );
        service.repository().put_item(&bad_id, item).unwrap();

        assert_eq!(service.find_by_cpc_processed(false).unwrap(), vec![good]);
        assert!(service.load(&bad_id).is_err());
    }

    #[test]
    fn test_save_and_load_far_future_creation_date() {
        let service = service();
        let mut job = Metadata::with_created_date(
            Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap(),
        );
        job.cpc_processed = TriState::True;
        let id = service.save(&mut job).unwrap();

        assert_eq!(service.load(&id).unwrap(), job);
        assert_eq!(service.find_by_cpc_processed(true).unwrap(), vec![job]);
    }
}
