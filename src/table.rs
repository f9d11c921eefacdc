// WHY: ordered char -> substitute mapping that drives both detection and replacement
// Keys are single Unicode scalar values; order is the configuration order

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Built-in substitutes used when no table is configured
const DEFAULT_REPLACEMENTS: &[(char, &str)] = &[
    // Typographers' quotes
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    // Ellipsis and dashes
    ('\u{2026}', "..."),
    ('\u{2012}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2015}', "-"),
    // Fractions
    ('\u{00BD}', "1/2"),
    ('\u{00BC}', "1/4"),
    ('\u{00BE}', "3/4"),
];

/// Ordered mapping from a problem character to its plain-text substitute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementTable {
    entries: Vec<(char, String)>,
}

impl ReplacementTable {
    /// Table with no entries; detection against it never matches
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert or override a substitute
    /// WHY: an overridden key keeps its first position so ordering stays stable
    pub fn insert(&mut self, key: char, substitute: impl Into<String>) {
        let substitute = substitute.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = substitute,
            None => self.entries.push((key, substitute)),
        }
    }

    pub fn get(&self, key: char) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: char) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Problem characters in configuration order
    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReplacementTable {
    fn default() -> Self {
        DEFAULT_REPLACEMENTS
            .iter()
            .map(|&(k, v)| (k, v.to_string()))
            .collect()
    }
}

impl FromIterator<(char, String)> for ReplacementTable {
    fn from_iter<I: IntoIterator<Item = (char, String)>>(iter: I) -> Self {
        let mut table = Self::empty();
        for (key, substitute) in iter {
            table.insert(key, substitute);
        }
        table
    }
}

impl Serialize for ReplacementTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, substitute) in &self.entries {
            map.serialize_entry(&key.to_string(), substitute)?;
        }
        map.end()
    }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = ReplacementTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from single characters to replacement strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = ReplacementTable::empty();
        while let Some((key, substitute)) = access.next_entry::<String, String>()? {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => table.insert(c, substitute),
                _ => {
                    return Err(serde::de::Error::custom(format!(
                        "replacement key {key:?} must be exactly one character"
                    )))
                }
            }
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for ReplacementTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor)
    }
}
