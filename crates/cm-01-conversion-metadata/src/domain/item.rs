//! # Attribute Item Mapping
//!
//! Converts a [`Metadata`] record to and from the flat attribute map a
//! key-value store persists, using the names in [`schema::attributes`].
//!
//! Unset optional fields and unknown tri-states are left out of the item.
//! `cpc_processed` only travels inside the composite attribute.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::composite::{self, DecodePolicy};
use crate::domain::errors::MetadataError;
use crate::domain::record::Metadata;
use crate::domain::schema::attributes;
use crate::domain::tristate::TriState;

/// A stored attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String.
    S(String),
    /// Number, kept in its decimal string form.
    N(String),
    /// Boolean.
    Bool(bool),
}

impl AttributeValue {
    /// The string payload, if this is a string.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Attribute name to value, as handed to the store.
pub type MetadataItem = BTreeMap<String, AttributeValue>;

impl Metadata {
    /// Map this record to its stored attributes.
    pub fn to_item(&self) -> MetadataItem {
        let mut item = MetadataItem::new();

        let strings = [
            (attributes::UUID, &self.id),
            (attributes::TIN, &self.tin),
            (attributes::NPI, &self.npi),
            (attributes::APM, &self.apm),
            (attributes::SUBMISSION_LOCATOR, &self.submission_locator),
            (attributes::QPP_LOCATOR, &self.qpp_locator),
            (attributes::FILE_NAME, &self.file_name),
            (attributes::CPC, &self.cpc_program_tag),
            (attributes::CONVERSION_ERROR_LOCATOR, &self.conversion_error_locator),
            (attributes::VALIDATION_ERROR_LOCATOR, &self.validation_error_locator),
            (
                attributes::RAW_VALIDATION_ERROR_LOCATOR,
                &self.raw_validation_error_locator,
            ),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                item.insert(name.to_string(), AttributeValue::S(value.clone()));
            }
        }

        let flags = [
            (attributes::OVERALL_STATUS, self.overall_status),
            (attributes::CONVERSION_STATUS, self.conversion_status),
            (attributes::VALIDATION_STATUS, self.validation_status),
            (attributes::TEST, TriState::from(self.is_test)),
        ];
        for (name, value) in flags {
            if let Some(value) = value.as_bool() {
                item.insert(name.to_string(), AttributeValue::Bool(value));
            }
        }

        if let Some(year) = self.submission_year {
            item.insert(
                attributes::SUBMISSION_YEAR.to_string(),
                AttributeValue::N(year.to_string()),
            );
        }

        item.insert(
            attributes::CREATE_DATE.to_string(),
            AttributeValue::S(composite::format_instant(&self.created_date)),
        );

        if let Some(combined) = self.cpc_processed_create_date() {
            item.insert(
                attributes::CPC_PROCESSED_CREATE_DATE.to_string(),
                AttributeValue::S(combined),
            );
        }

        item
    }

    /// Rebuild a record from stored attributes.
    ///
    /// `CreateDate` is required. When the composite attribute is present it
    /// is decoded last, so its timestamp wins over `CreateDate`.
    pub fn from_item(item: &MetadataItem, policy: DecodePolicy) -> Result<Self, MetadataError> {
        let created = string(item, attributes::CREATE_DATE)?.ok_or(
            MetadataError::MissingAttribute {
                attribute: attributes::CREATE_DATE,
            },
        )?;
        let mut metadata = Metadata::with_created_date(composite::parse_instant(created)?);

        metadata.id = owned(item, attributes::UUID)?;
        metadata.tin = owned(item, attributes::TIN)?;
        metadata.npi = owned(item, attributes::NPI)?;
        metadata.apm = owned(item, attributes::APM)?;
        metadata.submission_locator = owned(item, attributes::SUBMISSION_LOCATOR)?;
        metadata.qpp_locator = owned(item, attributes::QPP_LOCATOR)?;
        metadata.file_name = owned(item, attributes::FILE_NAME)?;
        metadata.cpc_program_tag = owned(item, attributes::CPC)?;
        metadata.conversion_error_locator = owned(item, attributes::CONVERSION_ERROR_LOCATOR)?;
        metadata.validation_error_locator = owned(item, attributes::VALIDATION_ERROR_LOCATOR)?;
        metadata.raw_validation_error_locator =
            owned(item, attributes::RAW_VALIDATION_ERROR_LOCATOR)?;

        metadata.overall_status = flag(item, attributes::OVERALL_STATUS)?;
        metadata.conversion_status = flag(item, attributes::CONVERSION_STATUS)?;
        metadata.validation_status = flag(item, attributes::VALIDATION_STATUS)?;
        metadata.is_test = flag(item, attributes::TEST)?.as_bool();

        metadata.submission_year = number(item, attributes::SUBMISSION_YEAR)?;

        if let Some(combined) = string(item, attributes::CPC_PROCESSED_CREATE_DATE)? {
            metadata.apply_cpc_processed_create_date(combined, policy)?;
        }

        Ok(metadata)
    }
}

fn string<'a>(
    item: &'a MetadataItem,
    attribute: &'static str,
) -> Result<Option<&'a str>, MetadataError> {
    match item.get(attribute) {
        None => Ok(None),
        Some(AttributeValue::S(value)) => Ok(Some(value.as_str())),
        Some(_) => Err(MetadataError::AttributeType {
            attribute,
            expected: "S",
        }),
    }
}

fn owned(item: &MetadataItem, attribute: &'static str) -> Result<Option<String>, MetadataError> {
    string(item, attribute).map(|value| value.map(str::to_string))
}

fn flag(item: &MetadataItem, attribute: &'static str) -> Result<TriState, MetadataError> {
    match item.get(attribute) {
        None => Ok(TriState::Unknown),
        Some(AttributeValue::Bool(value)) => Ok(TriState::from(*value)),
        Some(_) => Err(MetadataError::AttributeType {
            attribute,
            expected: "BOOL",
        }),
    }
}

fn number(item: &MetadataItem, attribute: &'static str) -> Result<Option<i64>, MetadataError> {
    let mismatch = MetadataError::AttributeType {
        attribute,
        expected: "N",
    };
    match item.get(attribute) {
        None => Ok(None),
        Some(AttributeValue::N(value)) => value.parse().map(Some).map_err(|_| mismatch),
        Some(_) => Err(mismatch),
    }
}
