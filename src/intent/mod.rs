//! Intent Classifier
//!
//! Routes a voice or text command to one of a fixed set of intents:
//!
//! - **Types**: `Intent`, `NavigationTarget`, `CommandOutcome`
//! - **Rules**: ordered groups of trigger terms with their response texts
//!
//! Groups are tested in order (appointment, medication, vitals, profile) and
//! the first group with any matching term wins. Matching is plain substring
//! containment on the lowercased transcript.
//!
//! ```rust
//! use healthdash::intent::{classify, Intent};
//!
//! assert_eq!(classify("Please schedule an appointment"), Intent::Appointment);
//! assert_eq!(classify("xyzzy"), Intent::Unknown);
//! ```

mod rules;
mod types;

pub use rules::IntentRule;
pub use types::{CommandOutcome, Intent, NavigationTarget};

use std::sync::OnceLock;

/// First-match-wins classifier over ordered [`IntentRule`]s
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
    unknown: IntentRule,
}

impl IntentClassifier {
    /// Classifier over the built-in command groups
    pub fn builtin() -> Self {
        Self {
            rules: rules::builtin_rules(),
            unknown: rules::unknown_rule(),
        }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    fn select(&self, lowered: &str) -> &IntentRule {
        self.rules
            .iter()
            .fold(None::<&IntentRule>, |found, rule| {
                found.or_else(|| rule.matches(lowered).then_some(rule))
            })
            .unwrap_or(&self.unknown)
    }

    /// Classify a transcript
    pub fn classify(&self, transcript: &str) -> Intent {
        self.select(&transcript.to_lowercase()).intent
    }

    /// Classify a transcript and attach the response texts
    pub fn interpret(&self, transcript: &str) -> CommandOutcome {
        let lowered = transcript.to_lowercase();
        let rule = self.select(&lowered);

        tracing::debug!(transcript = %lowered, intent = %rule.intent, "Classified command");

        CommandOutcome {
            intent: rule.intent,
            transcript: lowered,
            feedback_text: rule.feedback.clone(),
            speech_text: rule.speech.clone(),
            navigation_target: rule.navigation,
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_classifier() -> &'static IntentClassifier {
    static CLASSIFIER: OnceLock<IntentClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(IntentClassifier::builtin)
}

/// Classify a transcript with the built-in rules
pub fn classify(transcript: &str) -> Intent {
    builtin_classifier().classify(transcript)
}

/// Interpret a transcript with the built-in rules
pub fn interpret(transcript: &str) -> CommandOutcome {
    builtin_classifier().interpret(transcript)
}
