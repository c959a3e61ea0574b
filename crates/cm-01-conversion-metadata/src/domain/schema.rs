//! # Metadata Schema
//!
//! Field descriptor table for the `ConversionMetadata` table: which stored
//! attribute each record field maps to, which attributes the persistence
//! layer must encrypt, and which are derived from other fields.
//!
//! The table is pure metadata. Nothing in this module encrypts anything.

/// Stored attribute names.
pub mod attributes {
    pub const UUID: &str = "Uuid";
    pub const TIN: &str = "Tin";
    pub const NPI: &str = "Npi";
    pub const APM: &str = "Apm";
    pub const SUBMISSION_YEAR: &str = "SubmissionYear";
    pub const SUBMISSION_LOCATOR: &str = "SubmissionLocator";
    pub const QPP_LOCATOR: &str = "QPPLocator";
    pub const FILE_NAME: &str = "FileName";
    pub const OVERALL_STATUS: &str = "OverallStatus";
    pub const CONVERSION_STATUS: &str = "ConversionStatus";
    pub const VALIDATION_STATUS: &str = "ValidationStatus";
    pub const CPC: &str = "Cpc";
    pub const CONVERSION_ERROR_LOCATOR: &str = "ConversionErrorLocator";
    pub const VALIDATION_ERROR_LOCATOR: &str = "ValidationErrorLocator";
    pub const RAW_VALIDATION_ERROR_LOCATOR: &str = "RawValidationErrorLocator";
    pub const CREATE_DATE: &str = "CreateDate";
    pub const TEST: &str = "Test";
    pub const CPC_PROCESSED_CREATE_DATE: &str = "CpcProcessed_CreateDate";
}

/// How a field participates in the stored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Partition key, assigned by the store on first save.
    HashKey,
    /// Ordinary stored attribute.
    Attribute,
    /// Not stored under its own attribute.
    Ignored,
}

/// One row of the descriptor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Record field name.
    pub field: &'static str,
    /// Stored attribute name, `None` for ignored fields.
    pub attribute: Option<&'static str>,
    /// Whether the value must be encrypted at rest.
    pub encrypt: bool,
    /// Whether the value is computed from other fields.
    pub derived: bool,
    /// Role in the stored item.
    pub role: KeyRole,
}

impl FieldDescriptor {
    const fn plain(field: &'static str, attribute: &'static str) -> Self {
        Self {
            field,
            attribute: Some(attribute),
            encrypt: false,
            derived: false,
            role: KeyRole::Attribute,
        }
    }

    const fn sensitive(field: &'static str, attribute: &'static str) -> Self {
        Self {
            encrypt: true,
            ..Self::plain(field, attribute)
        }
    }
}

/// Descriptor table for one stored record type.
#[derive(Debug)]
pub struct MetadataSchema {
    table_name: &'static str,
    fields: &'static [FieldDescriptor],
}

/// Schema of the conversion metadata table.
pub static METADATA_SCHEMA: MetadataSchema = MetadataSchema {
    table_name: "ConversionMetadata",
    fields: &[
        FieldDescriptor {
            field: "id",
            attribute: Some(attributes::UUID),
            encrypt: false,
            derived: false,
            role: KeyRole::HashKey,
        },
        FieldDescriptor::sensitive("tin", attributes::TIN),
        FieldDescriptor::plain("npi", attributes::NPI),
        FieldDescriptor::plain("apm", attributes::APM),
        FieldDescriptor::plain("submissionYear", attributes::SUBMISSION_YEAR),
        FieldDescriptor::plain("submissionLocator", attributes::SUBMISSION_LOCATOR),
        FieldDescriptor::plain("qppLocator", attributes::QPP_LOCATOR),
        FieldDescriptor::sensitive("fileName", attributes::FILE_NAME),
        FieldDescriptor::plain("overallStatus", attributes::OVERALL_STATUS),
        FieldDescriptor::plain("conversionStatus", attributes::CONVERSION_STATUS),
        FieldDescriptor::plain("validationStatus", attributes::VALIDATION_STATUS),
        FieldDescriptor::plain("cpcProgramTag", attributes::CPC),
        FieldDescriptor::plain("conversionErrorLocator", attributes::CONVERSION_ERROR_LOCATOR),
        FieldDescriptor::plain("validationErrorLocator", attributes::VALIDATION_ERROR_LOCATOR),
        FieldDescriptor::plain(
            "rawValidationErrorLocator",
            attributes::RAW_VALIDATION_ERROR_LOCATOR,
        ),
        FieldDescriptor::plain("createdDate", attributes::CREATE_DATE),
        FieldDescriptor::plain("isTest", attributes::TEST),
        FieldDescriptor {
            field: "cpcProcessed",
            attribute: None,
            encrypt: false,
            derived: false,
            role: KeyRole::Ignored,
        },
        FieldDescriptor {
            field: "cpcProcessedCreateDate",
            attribute: Some(attributes::CPC_PROCESSED_CREATE_DATE),
            encrypt: false,
            derived: true,
            role: KeyRole::Attribute,
        },
    ],
};

impl MetadataSchema {
    /// Name of the backing table.
    pub fn table_name(&self) -> &'static str {
        self.table_name
    }

    /// Every descriptor, in declaration order.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Look up a descriptor by record field name.
    pub fn by_field(&self, field: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|d| d.field == field)
    }

    /// Look up a descriptor by stored attribute name.
    pub fn by_attribute(&self, attribute: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|d| d.attribute == Some(attribute))
    }

    /// Whether the stored attribute must be encrypted at rest.
    ///
    /// Unknown attributes are not part of this schema and are never encrypted.
    pub fn should_encrypt(&self, attribute: &str) -> bool {
        self.by_attribute(attribute).is_some_and(|d| d.encrypt)
    }

    /// Attributes the persistence layer must encrypt.
    pub fn encrypted_attributes(&self) -> impl Iterator<Item = &'static str> {
        self.stored().filter(|d| d.encrypt).filter_map(|d| d.attribute)
    }

    /// Attributes exempt from encryption.
    pub fn exempt_attributes(&self) -> impl Iterator<Item = &'static str> {
        self.stored().filter(|d| !d.encrypt).filter_map(|d| d.attribute)
    }

    /// Attributes computed from other fields.
    pub fn derived_attributes(&self) -> impl Iterator<Item = &'static str> {
        self.stored().filter(|d| d.derived).filter_map(|d| d.attribute)
    }

    /// The partition key descriptor.
    pub fn hash_key(&self) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|d| d.role == KeyRole::HashKey)
    }

    fn stored(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        let fields: &'static [FieldDescriptor] = self.fields;
        fields.iter().filter(|d| d.role != KeyRole::Ignored)
    }
}
