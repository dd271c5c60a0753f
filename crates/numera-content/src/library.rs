//! In-memory lookup of accepted content by number and category.

use std::collections::BTreeMap;

use crate::record::NumerologyContentRecord;

#[derive(Debug, Default)]
struct NumberContent {
    themes: Vec<String>,
    /// Category name to entries, merged across records.
    categories: BTreeMap<String, Vec<String>>,
}

/// Accepted records, merged per number in insertion order.
#[derive(Debug, Default)]
pub struct ContentLibrary {
    numbers: BTreeMap<u32, NumberContent>,
}

impl ContentLibrary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a NumerologyContentRecord>,
    {
        let mut library = Self::default();
        for record in records {
            library.insert(record);
        }
        library
    }

    pub fn insert(&mut self, record: &NumerologyContentRecord) {
        let content = self.numbers.entry(record.number.value()).or_default();

        let theme = &record.generation_info.theme;
        if !content.themes.contains(theme) {
            content.themes.push(theme.clone());
        }

        for (name, entries) in &record.categories {
            content
                .categories
                .entry(name.clone())
                .or_default()
                .extend(entries.iter().cloned());
        }
    }

    /// Numbers with at least one record, ascending.
    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.numbers.keys().copied()
    }

    pub fn contains(&self, number: u32) -> bool {
        self.numbers.contains_key(&number)
    }

    /// Entries for `number` in `category`; empty when there are none.
    pub fn entries(&self, number: u32, category: &str) -> &[String] {
        self.numbers
            .get(&number)
            .and_then(|c| c.categories.get(category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Category names that hold content for `number`, sorted.
    pub fn categories(&self, number: u32) -> Vec<&str> {
        self.numbers
            .get(&number)
            .map(|c| c.categories.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Distinct themes of the records for `number`, first seen first.
    pub fn themes(&self, number: u32) -> &[String] {
        self.numbers
            .get(&number)
            .map(|c| c.themes.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_entries(&self) -> usize {
        self.numbers
            .values()
            .flat_map(|c| c.categories.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(number: u32, theme: &str, insight: &[&str]) -> NumerologyContentRecord {
        serde_json::from_value(json!({
            "number": number,
            "generation_info": {
                "date": "2025-08-05",
                "time_context": "universal",
                "theme": theme,
                "batch_size": insight.len()
            },
            "insight": insight,
            "shadow": ["Overgiving"]
        }))
        .unwrap()
    }

    #[test]
    fn merges_records_per_number() {
        let records = [
            record(6, "care", &["Love serves."]),
            record(6, "home", &["Home is a verb."]),
            record(6, "care", &[]),
            record(22, "building", &["Dream in blueprints."]),
        ];
        let library = ContentLibrary::from_records(&records);

        assert_eq!(library.numbers().collect::<Vec<_>>(), [6, 22]);
        assert_eq!(library.entries(6, "insight"), ["Love serves.", "Home is a verb."]);
        assert_eq!(library.entries(6, "shadow").len(), 3);
        assert_eq!(library.themes(6), ["care", "home"]);
        assert_eq!(library.categories(22), ["insight", "shadow"]);
        assert_eq!(library.total_entries(), 7);
    }

    #[test]
    fn unknown_lookups_are_empty() {
        let library = ContentLibrary::from_records(&[record(1, "start", &["Begin."])]);
        assert!(library.entries(1, "archetype").is_empty());
        assert!(library.entries(9, "insight").is_empty());
        assert!(library.categories(9).is_empty());
        assert!(library.themes(9).is_empty());
        assert!(!library.contains(9));
    }
}
