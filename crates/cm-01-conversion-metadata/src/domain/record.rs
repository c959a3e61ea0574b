//! # Metadata Record
//!
//! One conversion job's tracked state. Created when a job starts, filled in
//! field by field as pipeline stages complete, then handed to the
//! persistence layer.
//!
//! A record has a single writer at a time. Nothing here synchronizes.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::composite::{self, DecodePolicy};
use crate::domain::errors::MetadataError;
use crate::domain::tristate::TriState;

/// Conversion metadata for one submitted file.
///
/// Fields missing from a serialized record take their [`Default`] values, so
/// an absent `createdDate` is stamped with the time of deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    /// Unique identifier, assigned by the store on first save.
    #[serde(rename = "uuid")]
    pub id: Option<String>,
    /// Taxpayer identification number. Encrypted at rest.
    pub tin: Option<String>,
    /// National provider identifier.
    pub npi: Option<String>,
    /// APM entity identifier (CPC+ submissions).
    pub apm: Option<String>,
    pub submission_year: Option<i64>,
    /// Where the submitted file is stored (e.g. an object-store ARN).
    pub submission_locator: Option<String>,
    /// Where the generated QPP output is stored.
    pub qpp_locator: Option<String>,
    /// Name of the uploaded file. Encrypted at rest.
    pub file_name: Option<String>,
    /// Conversion and validation together.
    pub overall_status: TriState,
    pub conversion_status: TriState,
    pub validation_status: TriState,
    /// `"CPC_"` plus a number, used to partition the CPC+ index.
    ///
    /// `None` means the job is not a CPC+ conversion. The shape is the
    /// writer's responsibility and is not checked here.
    #[serde(rename = "cpc")]
    pub cpc_program_tag: Option<String>,
    pub conversion_error_locator: Option<String>,
    pub validation_error_locator: Option<String>,
    /// Where the raw validation error response is stored.
    pub raw_validation_error_locator: Option<String>,
    /// Creation instant. Stamped on construction.
    pub created_date: DateTime<Utc>,
    /// Whether CPC+ post-processing has run.
    ///
    /// Persisted only through the composite attribute.
    pub cpc_processed: TriState,
    /// Marks the record as test data.
    #[serde(rename = "test")]
    pub is_test: Option<bool>,
}

impl Metadata {
    /// Create a record stamped with the current instant.
    pub fn new() -> Self {
        Self::with_created_date(Utc::now())
    }

    /// Create a record stamped with the given instant.
    pub fn with_created_date(created_date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            tin: None,
            npi: None,
            apm: None,
            submission_year: None,
            submission_locator: None,
            qpp_locator: None,
            file_name: None,
            overall_status: TriState::Unknown,
            conversion_status: TriState::Unknown,
            validation_status: TriState::Unknown,
            cpc_program_tag: None,
            conversion_error_locator: None,
            validation_error_locator: None,
            raw_validation_error_locator: None,
            created_date,
            cpc_processed: TriState::Unknown,
            is_test: None,
        }
    }

    /// Whether this was a CPC+ conversion.
    pub fn is_cpc(&self) -> bool {
        self.cpc_program_tag.is_some()
    }

    /// The combined `CpcProcessed_CreateDate` attribute.
    ///
    /// `None` while `cpc_processed` is unknown.
    pub fn cpc_processed_create_date(&self) -> Option<String> {
        self.cpc_processed
            .as_bool()
            .map(|processed| composite::encode(processed, &self.created_date))
    }

    /// Set `cpc_processed` and `created_date` from a combined attribute.
    ///
    /// A value without two `#`-separated fields is ignored.
    pub fn set_cpc_processed_create_date(&mut self, combination: &str) -> Result<(), MetadataError> {
        self.apply_cpc_processed_create_date(combination, DecodePolicy::Lenient)
            .map(|_| ())
    }

    /// Set `cpc_processed` and `created_date` from a combined attribute.
    ///
    /// Returns `false` when the value was incomplete and skipped under
    /// [`DecodePolicy::Lenient`]. On error neither field changes.
    pub fn apply_cpc_processed_create_date(
        &mut self,
        combination: &str,
        policy: DecodePolicy,
    ) -> Result<bool, MetadataError> {
        match composite::decode(combination, policy)? {
            Some((processed, created_date)) => {
                self.cpc_processed = TriState::from(processed);
                self.created_date = created_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

// Equality covers the canonical fields only. `is_test` and the derived
// composite attribute take no part.
impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.tin == other.tin
            && self.npi == other.npi
            && self.apm == other.apm
            && self.submission_year == other.submission_year
            && self.submission_locator == other.submission_locator
            && self.qpp_locator == other.qpp_locator
            && self.file_name == other.file_name
            && self.overall_status == other.overall_status
            && self.conversion_status == other.conversion_status
            && self.validation_status == other.validation_status
            && self.cpc_program_tag == other.cpc_program_tag
            && self.conversion_error_locator == other.conversion_error_locator
            && self.validation_error_locator == other.validation_error_locator
            && self.raw_validation_error_locator == other.raw_validation_error_locator
            && self.created_date == other.created_date
            && self.cpc_processed == other.cpc_processed
    }
}

impl Eq for Metadata {}

impl Hash for Metadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.tin.hash(state);
        self.npi.hash(state);
        self.apm.hash(state);
        self.submission_year.hash(state);
        self.submission_locator.hash(state);
        self.qpp_locator.hash(state);
        self.file_name.hash(state);
        self.overall_status.hash(state);
        self.conversion_status.hash(state);
        self.validation_status.hash(state);
        self.cpc_program_tag.hash(state);
        self.conversion_error_locator.hash(state);
        self.validation_error_locator.hash(state);
        self.raw_validation_error_locator.hash(state);
        self.created_date.hash(state);
        self.cpc_processed.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::hash_map::DefaultHasher;

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 12, 8, 18, 32, 54).unwrap()
            + chrono::Duration::milliseconds(846)
    }

    fn populated() -> Metadata {
        let mut metadata = Metadata::with_created_date(fixed_instant());
        metadata.id = Some("0b0f6c2e".to_string());
        metadata.tin = Some("000777777".to_string());
        metadata.npi = Some("0876543210".to_string());
        metadata.apm = Some("T1AR0503".to_string());
        metadata.submission_year = Some(2017);
        metadata.file_name = Some("valid-QRDA-III.xml".to_string());
        metadata.overall_status = TriState::True;
        metadata.conversion_status = TriState::True;
        metadata.validation_status = TriState::False;
        metadata.cpc_program_tag = Some("CPC_1".to_string());
        metadata.cpc_processed = TriState::False;
        metadata
    }

    fn hash_of(metadata: &Metadata) -> u64 {
        let mut hasher = DefaultHasher::new();
        metadata.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_new_stamps_created_date() {
        let before = Utc::now();
        let metadata = Metadata::new();
        let after = Utc::now();

        assert!(metadata.created_date >= before);
        assert!(metadata.created_date <= after);
        assert!(after - metadata.created_date < chrono::Duration::milliseconds(500));
    }

    #[test]
    fn test_composite_absent_while_processed_unknown() {
        let metadata = Metadata::with_created_date(fixed_instant());
        assert_eq!(metadata.cpc_processed_create_date(), None);
    }

    #[test]
    fn test_composite_encodes_processed_and_date() {
        let mut metadata = Metadata::with_created_date(fixed_instant());
        metadata.cpc_processed = TriState::True;
        assert_eq!(
            metadata.cpc_processed_create_date().as_deref(),
            Some("true#2017-12-08T18:32:54.846Z")
        );
        assert_eq!(
            metadata.cpc_processed_create_date(),
            metadata.cpc_processed_create_date()
        );
    }

    #[test]
    fn test_set_composite_restores_both_fields() {
        let mut metadata = Metadata::new();
        metadata
            .set_cpc_processed_create_date("true#2017-12-08T18:32:54.846Z")
            .unwrap();

        assert_eq!(metadata.cpc_processed, TriState::True);
        assert_eq!(metadata.created_date, fixed_instant());
    }

    #[test]
    fn test_set_incomplete_composite_is_a_no_op() {
        let mut metadata = populated();
        let before = metadata.clone();

        metadata.set_cpc_processed_create_date("").unwrap();
        metadata.set_cpc_processed_create_date("onlyonefield").unwrap();
        metadata.set_cpc_processed_create_date("##").unwrap();
        metadata.set_cpc_processed_create_date("true##").unwrap();

        assert_eq!(metadata.cpc_processed, before.cpc_processed);
        assert_eq!(metadata.created_date, before.created_date);
    }

    #[test]
    fn test_strict_policy_surfaces_incomplete_composite() {
        let mut metadata = populated();
        for value in ["onlyonefield", "##"] {
            let result = metadata.apply_cpc_processed_create_date(value, DecodePolicy::Strict);
            assert!(
                matches!(result, Err(MetadataError::IncompleteComposite { .. })),
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_malformed_timestamp_leaves_fields_untouched() {
        let mut metadata = populated();
        let result = metadata.set_cpc_processed_create_date("true#not-a-timestamp");

        assert!(matches!(
            result,
            Err(MetadataError::MalformedTimestamp { .. })
        ));
        assert_eq!(metadata.cpc_processed, TriState::False);
        assert_eq!(metadata.created_date, fixed_instant());
    }

    #[test]
    fn test_equality_ignores_is_test() {
        let a = populated();
        let mut b = populated();
        b.is_test = Some(true);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_equality_detects_tin_change() {
        let a = populated();
        let mut b = populated();
        b.tin = Some("000888888".to_string());

        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_compares_cpc_processed_directly() {
        let a = populated();
        let mut b = populated();
        b.cpc_processed = TriState::Unknown;

        assert_ne!(a, b);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(populated()).unwrap();
        assert_eq!(json["uuid"], "0b0f6c2e");
        assert_eq!(json["cpc"], "CPC_1");
        assert_eq!(json["cpcProcessed"], false);
        assert_eq!(json["submissionYear"], 2017);
        assert!(json["test"].is_null());

        let back: Metadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, populated());
    }

    #[test]
    fn test_json_missing_fields_take_defaults() {
        let before = Utc::now();
        let metadata: Metadata = serde_json::from_str(r#"{"tin":"1"}"#).unwrap();
        let after = Utc::now();

        assert_eq!(metadata.tin.as_deref(), Some("1"));
        assert_eq!(metadata.id, None);
        assert_eq!(metadata.overall_status, TriState::Unknown);
        assert_eq!(metadata.cpc_processed, TriState::Unknown);
        assert!(metadata.created_date >= before && metadata.created_date <= after);
    }
}
