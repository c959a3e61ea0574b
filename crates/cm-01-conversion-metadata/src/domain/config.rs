//! # Metadata Configuration
//!
//! Settings for the Conversion Metadata service, with defaults suitable for
//! production and an environment-variable loader for hosted deployments.

use std::env;

use crate::domain::composite::DecodePolicy;
use crate::domain::schema::METADATA_SCHEMA;

/// Configuration for the metadata service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataConfig {
    /// Name of the backing table (default: `ConversionMetadata`).
    pub table_name: String,

    /// Handling of composite attributes that do not split into two fields.
    ///
    /// Lenient by default so items written before the composite existed
    /// still load.
    pub decode_policy: DecodePolicy,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            table_name: METADATA_SCHEMA.table_name().to_string(),
            decode_policy: DecodePolicy::Lenient,
        }
    }
}

impl MetadataConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CM_TABLE_NAME`: Table name (default: ConversionMetadata)
    /// - `CM_STRICT_COMPOSITE`: Reject incomplete composites (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let strict = env::var("CM_STRICT_COMPOSITE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Self {
            table_name: env::var("CM_TABLE_NAME").unwrap_or(defaults.table_name),
            decode_policy: if strict {
                DecodePolicy::Strict
            } else {
                defaults.decode_policy
            },
        }
    }

    /// Set the table name.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Set the composite decode policy.
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetadataConfig::default();
        assert_eq!(config.table_name, "ConversionMetadata");
        assert_eq!(config.decode_policy, DecodePolicy::Lenient);
    }

    #[test]
    fn test_builder_chaining() {
        let config = MetadataConfig::new()
            .with_table_name("ConversionMetadata-dev")
            .with_decode_policy(DecodePolicy::Strict);

        assert_eq!(config.table_name, "ConversionMetadata-dev");
        assert_eq!(config.decode_policy, DecodePolicy::Strict);
    }
}
