//! Keyword table for the health-query responder
//!
//! An ordered list of `(keyword, response)` pairs. Order matters: the
//! responder lets later matches overwrite earlier ones.

use serde::{Deserialize, Serialize};

use super::error::{ResponderError, ResponderResult};

/// A single keyword → answer pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordEntry {
    /// Substring searched for in the lowercased query
    pub keyword: String,
    /// Answer returned when this entry wins
    pub response: String,
}

impl KeywordEntry {
    /// Create an entry, normalizing the keyword to lowercase
    pub fn new(keyword: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into().trim().to_lowercase(),
            response: response.into(),
        }
    }

    /// Whether this entry's keyword occurs in an already-lowercased query
    pub fn matches(&self, lowered_query: &str) -> bool {
        lowered_query.contains(self.keyword.as_str())
    }
}

const BUILTIN: &[(&str, &str)] = &[
    (
        "headache",
        "Headaches can be caused by dehydration, stress, or lack of sleep. Try drinking water, resting, and taking a break from screens. If it persists for more than 24 hours, consider consulting your doctor.",
    ),
    (
        "sleep",
        "For better sleep, try maintaining a consistent schedule, avoiding caffeine after noon, creating a relaxing bedtime routine, and keeping your bedroom cool and dark.",
    ),
    (
        "water",
        "The recommended daily water intake is about 8 glasses or 2 liters, but this varies based on your activity level, climate, and overall health.",
    ),
    (
        "exercise",
        "Even 30 minutes of moderate exercise daily can significantly improve your health. Try walking, swimming, or cycling if you're just starting out.",
    ),
    (
        "stress",
        "Managing stress through mindfulness meditation, deep breathing exercises, and regular physical activity can help improve both mental and physical health.",
    ),
    (
        "diet",
        "A balanced diet rich in fruits, vegetables, lean proteins, and whole grains is essential for maintaining good health. Try to limit processed foods and added sugars.",
    ),
];

/// Ordered, append-only keyword table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<KeywordEntry>,
}

impl KeywordTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in health table in its declared order
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(keyword, response)| KeywordEntry::new(*keyword, *response))
                .collect(),
        }
    }

    /// Append an entry at the end of the table
    ///
    /// Appended entries are evaluated last and therefore override any earlier
    /// entry that also matches.
    pub fn push(&mut self, entry: KeywordEntry) -> ResponderResult<()> {
        if entry.keyword.is_empty() {
            return Err(ResponderError::EmptyKeyword {
                response: entry.response,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Append several entries, stopping at the first invalid one
    pub fn extend<I>(&mut self, entries: I) -> ResponderResult<()>
    where
        I: IntoIterator<Item = KeywordEntry>,
    {
        for entry in entries {
            self.push(entry)?;
        }
        Ok(())
    }

    /// Builder method: append an entry
    pub fn with_entry(mut self, entry: KeywordEntry) -> ResponderResult<Self> {
        self.push(entry)?;
        Ok(self)
    }

    /// Iterate entries in evaluation order
    pub fn iter(&self) -> std::slice::Iter<'_, KeywordEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of a keyword in evaluation order
    pub fn position(&self, keyword: &str) -> Option<usize> {
        let keyword = keyword.to_lowercase();
        self.entries.iter().position(|e| e.keyword == keyword)
    }
}

impl<'a> IntoIterator for &'a KeywordTable {
    type Item = &'a KeywordEntry;
    type IntoIter = std::slice::Iter<'a, KeywordEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let table = KeywordTable::builtin();
        let keywords: Vec<&str> = table.iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(
            keywords,
            vec!["headache", "sleep", "water", "exercise", "stress", "diet"]
        );
    }

    #[test]
    fn test_entry_normalizes_keyword() {
        let entry = KeywordEntry::new("  Flu ", "Rest and fluids.");
        assert_eq!(entry.keyword, "flu");
        assert!(entry.matches("i think i have the flu"));
    }

    #[test]
    fn test_push_rejects_empty_keyword() {
        let mut table = KeywordTable::new();
        let result = table.push(KeywordEntry::new("   ", "matches everything"));
        assert!(matches!(result, Err(ResponderError::EmptyKeyword { .. })));
        assert!(table.is_empty());
    }

    #[test]
    fn test_appended_entries_go_last() {
        let table = KeywordTable::builtin()
            .with_entry(KeywordEntry::new("cold", "Rest and stay warm."))
            .unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(table.position("cold"), Some(6));
        assert_eq!(table.position("HEADACHE"), Some(0));
    }
}
