//! Intent rule table
//!
//! Each rule pairs an intent with its trigger terms and the texts shown and
//! spoken when it fires. Rules are evaluated in declaration order.

use super::types::{Intent, NavigationTarget};

/// One group of trigger terms and the response it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRule {
    pub intent: Intent,
    /// Any of these substrings selects the rule
    pub terms: Vec<String>,
    /// Text displayed to the user
    pub feedback: String,
    /// Text handed to speech synthesis
    pub speech: String,
    /// View to open once the navigation delay elapses
    pub navigation: Option<NavigationTarget>,
}

impl IntentRule {
    pub fn new(
        intent: Intent,
        terms: &[&str],
        feedback: impl Into<String>,
        speech: impl Into<String>,
        navigation: Option<NavigationTarget>,
    ) -> Self {
        Self {
            intent,
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
            feedback: feedback.into(),
            speech: speech.into(),
            navigation,
        }
    }

    /// Whether any term occurs in an already-lowercased transcript
    pub fn matches(&self, lowered: &str) -> bool {
        self.terms.iter().any(|term| lowered.contains(term.as_str()))
    }
}

pub(crate) fn builtin_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new(
            Intent::Appointment,
            &["appointment", "schedule", "book"],
            "Scheduling appointment. When would you like to book?",
            "I can help you schedule an appointment. When would you like to book?",
            Some(NavigationTarget::Appointments),
        ),
        IntentRule::new(
            Intent::Medication,
            &["reminder", "medication"],
            "Setting up medication reminder. What medication do you need to be reminded about?",
            "I can help you set a medication reminder. What medication do you need to be reminded about?",
            Some(NavigationTarget::Medications),
        ),
        IntentRule::new(
            Intent::Vitals,
            &["vitals", "stats", "metrics", "dashboard"],
            "Checking your vital signs and health metrics on the dashboard.",
            "Here are your latest health metrics.",
            Some(NavigationTarget::Dashboard),
        ),
        IntentRule::new(
            Intent::Profile,
            &["profile", "settings", "account"],
            "Opening your profile settings.",
            "Opening your profile settings.",
            Some(NavigationTarget::Profile),
        ),
    ]
}

pub(crate) fn unknown_rule() -> IntentRule {
    IntentRule::new(
        Intent::Unknown,
        &[],
        "I didn't recognize that command. Try saying \"schedule appointment\", \"set medication reminder\", \"check my vitals\", or \"open profile\".",
        "I didn't recognize that command. Try saying schedule appointment, set medication reminder, check my vitals, or open profile.",
        None,
    )
}
