//! The rules a content record is checked against.

use numera_common_config::SchemaConfig;
use serde::{Deserialize, Serialize};

/// Schema for [`crate::validation::RecordValidator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Values accepted for `number`.
    pub allowed_numbers: Vec<u32>,
    /// Recognized category names, in listing order.
    pub categories: Vec<String>,
    /// Expected `time_context` values; empty accepts anything.
    pub time_contexts: Vec<String>,
    /// Warn when `batch_size` disagrees with array lengths.
    pub check_batch_size: bool,
    /// Warn on repeated entries within one category.
    pub flag_duplicates: bool,
}

impl RecordSchema {
    pub fn is_allowed(&self, number: u32) -> bool {
        self.allowed_numbers.contains(&number)
    }

    pub fn is_known_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    pub fn expects_time_context(&self, value: &str) -> bool {
        self.time_contexts.is_empty() || self.time_contexts.iter().any(|c| c == value)
    }
}

impl From<&SchemaConfig> for RecordSchema {
    fn from(config: &SchemaConfig) -> Self {
        Self {
            allowed_numbers: config.allowed_numbers.clone(),
            categories: config.categories.clone(),
            time_contexts: config.time_contexts.clone(),
            check_batch_size: config.check_batch_size,
            flag_duplicates: config.flag_duplicates,
        }
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::from(&SchemaConfig::default())
    }
}
