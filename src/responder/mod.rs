//! Health-Query Responder
//!
//! Answers free-text health questions from an ordered keyword table:
//!
//! - **Table**: ordered `(keyword, response)` pairs
//! - **Responder**: substring matcher over the table
//!
//! # Matching policy
//!
//! The query is lowercased and every entry whose keyword occurs anywhere in
//! it overwrites the candidate answer. The LAST matching entry in table order
//! wins, not the first and not the longest. There is no word-boundary check,
//! so `"stressful"` matches `stress`. Both behaviors are kept as-is; use
//! [`KeywordResponder::explain`] to see which entries were shadowed.
//!
//! ```rust
//! use healthdash::responder::{respond, FALLBACK_RESPONSE};
//!
//! assert_eq!(respond(""), FALLBACK_RESPONSE);
//! assert!(respond("How much water should I drink?").contains("8 glasses"));
//! ```

mod error;
mod table;

pub use error::{ResponderError, ResponderResult};
pub use table::{KeywordEntry, KeywordTable};

use serde::Serialize;
use std::sync::OnceLock;

/// Reply used when no keyword matches
pub const FALLBACK_RESPONSE: &str = "I don't have specific information about that. Consider consulting your healthcare provider for personalized advice.";

/// First assistant message of every chat session
pub const GREETING: &str = "Hello! I'm your AI health assistant. How can I help you today?";

/// Detailed outcome of a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// The answer text (fallback when nothing matched)
    pub text: String,
    /// Keyword of the winning entry
    pub winner: Option<String>,
    /// Every matching keyword, in table order
    pub matched: Vec<String>,
}

impl Reply {
    /// Whether the fallback was used
    pub fn is_fallback(&self) -> bool {
        self.winner.is_none()
    }

    /// Keywords that matched but lost to a later entry
    pub fn shadowed(&self) -> &[String] {
        match self.matched.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

/// Substring matcher over a [`KeywordTable`]
#[derive(Debug, Clone)]
pub struct KeywordResponder {
    table: KeywordTable,
    fallback: String,
}

impl KeywordResponder {
    /// Create a responder with the standard fallback text
    pub fn new(table: KeywordTable) -> Self {
        Self {
            table,
            fallback: FALLBACK_RESPONSE.to_string(),
        }
    }

    /// Responder over the built-in table
    pub fn builtin() -> Self {
        Self::new(KeywordTable::builtin())
    }

    /// Builder method: replace the fallback text
    pub fn fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    pub fn fallback_text(&self) -> &str {
        &self.fallback
    }

    /// Answer a query; the last matching entry wins
    pub fn respond(&self, query: &str) -> String {
        let lowered = query.to_lowercase();
        self.table
            .iter()
            .fold(None, |candidate, entry| {
                if entry.matches(&lowered) {
                    Some(entry)
                } else {
                    candidate
                }
            })
            .map(|entry| entry.response.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Answer a query and report every keyword that matched
    pub fn explain(&self, query: &str) -> Reply {
        let lowered = query.to_lowercase();
        let matched: Vec<&KeywordEntry> = self
            .table
            .iter()
            .filter(|entry| entry.matches(&lowered))
            .collect();

        let reply = match matched.last() {
            Some(winner) => Reply {
                text: winner.response.clone(),
                winner: Some(winner.keyword.clone()),
                matched: matched.iter().map(|e| e.keyword.clone()).collect(),
            },
            None => Reply {
                text: self.fallback.clone(),
                winner: None,
                matched: Vec::new(),
            },
        };

        if !reply.shadowed().is_empty() {
            tracing::debug!(
                winner = ?reply.winner,
                shadowed = ?reply.shadowed(),
                "Later keyword overrode earlier matches"
            );
        }

        reply
    }
}

impl Default for KeywordResponder {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_responder() -> &'static KeywordResponder {
    static RESPONDER: OnceLock<KeywordResponder> = OnceLock::new();
    RESPONDER.get_or_init(KeywordResponder::builtin)
}

/// Answer a query from the built-in table
pub fn respond(query: &str) -> String {
    builtin_responder().respond(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_text(keyword: &str) -> String {
        KeywordTable::builtin()
            .iter()
            .find(|e| e.keyword == keyword)
            .map(|e| e.response.clone())
            .unwrap()
    }

    #[test]
    fn test_empty_query_falls_back() {
        assert_eq!(respond(""), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_unknown_topic_falls_back() {
        assert_eq!(respond("tell me about quantum physics"), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_headache_and_cold() {
        // "cold" is not in the built-in table, so headache is the only match
        assert_eq!(
            respond("I have a headache and a cold"),
            builtin_text("headache")
        );
    }

    #[test]
    fn test_last_match_wins() {
        // headache is declared before sleep
        assert_eq!(
            respond("my headache keeps me from sleep"),
            builtin_text("sleep")
        );
        // stress is declared before diet, regardless of position in the query
        assert_eq!(respond("does diet affect stress?"), builtin_text("diet"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(respond("WATER intake?"), builtin_text("water"));
    }

    #[test]
    fn test_substring_without_word_boundary() {
        assert_eq!(respond("a stressful week"), builtin_text("stress"));
    }

    #[test]
    fn test_idempotent() {
        let query = "exercise and diet tips";
        assert_eq!(respond(query), respond(query));
    }

    #[test]
    fn test_appended_entry_overrides_builtin() {
        let table = KeywordTable::builtin()
            .with_entry(KeywordEntry::new("cold", "Rest and stay warm."))
            .unwrap();
        let responder = KeywordResponder::new(table);
        assert_eq!(
            responder.respond("I have a headache and a cold"),
            "Rest and stay warm."
        );
    }

    #[test]
    fn test_custom_fallback() {
        let responder = KeywordResponder::builtin().fallback("Ask your doctor.");
        assert_eq!(responder.respond("xyzzy"), "Ask your doctor.");
    }

    #[test]
    fn test_explain_reports_shadowing() {
        let reply = KeywordResponder::builtin().explain("headache, no sleep, too much stress");
        assert_eq!(reply.winner.as_deref(), Some("stress"));
        assert_eq!(reply.matched, vec!["headache", "sleep", "stress"]);
        assert_eq!(reply.shadowed(), &["headache".to_string(), "sleep".to_string()]);
        assert_eq!(reply.text, builtin_text("stress"));
    }

    #[test]
    fn test_explain_fallback() {
        let reply = KeywordResponder::builtin().explain("hello");
        assert!(reply.is_fallback());
        assert!(reply.matched.is_empty());
        assert!(reply.shadowed().is_empty());
        assert_eq!(reply.text, FALLBACK_RESPONSE);
    }
}
