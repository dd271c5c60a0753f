//! Typed form of a numerology content record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::number::NumerologyNumber;

/// Format of `generation_info.date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The twelve known category arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Insight,
    Reflection,
    Contemplation,
    Manifestation,
    Challenge,
    PhysicalPractice,
    Shadow,
    Archetype,
    EnergyCheck,
    NumericalContext,
    AstrologicalContext,
    MentalWellness,
}

impl Category {
    /// All categories in the order records list them.
    pub const ALL: [Category; 12] = [
        Self::Insight,
        Self::Reflection,
        Self::Contemplation,
        Self::Manifestation,
        Self::Challenge,
        Self::PhysicalPractice,
        Self::Shadow,
        Self::Archetype,
        Self::EnergyCheck,
        Self::NumericalContext,
        Self::AstrologicalContext,
        Self::MentalWellness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insight => "insight",
            Self::Reflection => "reflection",
            Self::Contemplation => "contemplation",
            Self::Manifestation => "manifestation",
            Self::Challenge => "challenge",
            Self::PhysicalPractice => "physical_practice",
            Self::Shadow => "shadow",
            Self::Archetype => "archetype",
            Self::EnergyCheck => "energy_check",
            Self::NumericalContext => "numerical_context",
            Self::AstrologicalContext => "astrological_context",
            Self::MentalWellness => "mental_wellness",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// The `generation_info` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInfo {
    pub date: String,
    pub time_context: String,
    pub theme: String,
    pub batch_size: u64,
    /// Fields beyond the four known ones, kept so re-serialization is lossless.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GenerationInfo {
    /// `date` as a calendar date, when it is in `YYYY-MM-DD` form.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }
}

/// A validated numerology content record.
///
/// `categories` holds every string-array field of the document, recognized
/// or not. Any other top-level field lands in `extra`. Both are flattened
/// back into the top level on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordFields")]
pub struct NumerologyContentRecord {
    pub number: NumerologyNumber,
    pub generation_info: GenerationInfo,
    #[serde(flatten)]
    pub categories: BTreeMap<String, Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Wire shape before top-level fields are split into categories and extras.
#[derive(Deserialize)]
struct RecordFields {
    number: NumerologyNumber,
    generation_info: GenerationInfo,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

impl From<RecordFields> for NumerologyContentRecord {
    fn from(fields: RecordFields) -> Self {
        let mut categories = BTreeMap::new();
        let mut extra = BTreeMap::new();

        for (key, value) in fields.rest {
            match string_array(&value) {
                Some(entries) => {
                    categories.insert(key, entries);
                }
                None => {
                    extra.insert(key, value);
                }
            }
        }

        Self {
            number: fields.number,
            generation_info: fields.generation_info,
            categories,
            extra,
        }
    }
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

impl NumerologyContentRecord {
    /// Entries of a known category; empty when the record lacks it.
    pub fn entries(&self, category: Category) -> &[String] {
        self.entries_named(category.as_str())
    }

    /// Entries of any category by name.
    pub fn entries_named(&self, name: &str) -> &[String] {
        self.categories.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_entries(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// The record as a JSON document in its original shape.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
