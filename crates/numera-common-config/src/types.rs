//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NumeraConfig {
    /// Content-record schema settings.
    pub schema: SchemaConfig,
    /// Corpus location and file discovery.
    pub corpus: CorpusConfig,
    /// Essay outline settings.
    pub essays: EssayConfig,
}

/// Numbers a record may describe: 1-9 plus the master numbers.
pub const DEFAULT_ALLOWED_NUMBERS: [u32; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 11, 22, 33, 44];

/// Category array names, in the order records usually list them.
pub const DEFAULT_CATEGORIES: [&str; 12] = [
    "insight",
    "reflection",
    "contemplation",
    "manifestation",
    "challenge",
    "physical_practice",
    "shadow",
    "archetype",
    "energy_check",
    "numerical_context",
    "astrological_context",
    "mental_wellness",
];

/// The conventional essay outline.
pub const DEFAULT_ESSAY_SECTIONS: [&str; 15] = [
    "Core Essence",
    "Archetype",
    "Mystical Significance",
    "Modern Life Application",
    "Numerology Profile",
    "Shadow and Light",
    "Modern Culture",
    "Relationship Compatibility",
    "Affirmations",
    "Rituals",
    "Chakra Resonance",
    "Symbolic Correspondences",
    "Frequency Data",
    "Myths and Quotes",
    "Conclusion",
];

/// Content-record schema configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Values accepted for `number`.
    pub allowed_numbers: Vec<u32>,
    /// Recognized category array names.
    pub categories: Vec<String>,
    /// Expected values of `generation_info.time_context`.
    pub time_contexts: Vec<String>,
    /// Warn when `batch_size` disagrees with the array lengths.
    pub check_batch_size: bool,
    /// Warn on repeated entries within one category.
    pub flag_duplicates: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            allowed_numbers: DEFAULT_ALLOWED_NUMBERS.to_vec(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            time_contexts: vec!["universal".to_string()],
            check_batch_size: true,
            flag_duplicates: true,
        }
    }
}

/// Corpus discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Root directory holding the content files.
    pub root: PathBuf,
    /// Extension of content-record files.
    pub record_extension: String,
    /// Extension of essay files.
    pub essay_extension: String,
    /// Follow symlinks while walking the root.
    pub follow_links: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content"),
            record_extension: "json".to_string(),
            essay_extension: "md".to_string(),
            follow_links: false,
        }
    }
}

/// Essay outline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EssayConfig {
    /// Section names in their conventional order.
    pub expected_sections: Vec<String>,
    /// Report sections that appear out of the conventional order.
    pub require_order: bool,
}

impl Default for EssayConfig {
    fn default() -> Self {
        Self {
            expected_sections: DEFAULT_ESSAY_SECTIONS.iter().map(|s| s.to_string()).collect(),
            require_order: true,
        }
    }
}
