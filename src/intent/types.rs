//! Intent and navigation types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified user goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Appointment,
    Medication,
    Vitals,
    Profile,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Appointment => "appointment",
            Intent::Medication => "medication",
            Intent::Vitals => "vitals",
            Intent::Profile => "profile",
            Intent::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Intent::Unknown)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard view a command navigates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTarget {
    Appointments,
    Medications,
    Dashboard,
    Profile,
}

impl NavigationTarget {
    /// Token the view router uses to select the tab
    pub fn token(&self) -> &'static str {
        match self {
            NavigationTarget::Appointments => "appointments",
            NavigationTarget::Medications => "medications",
            NavigationTarget::Dashboard => "dashboard",
            NavigationTarget::Profile => "profile",
        }
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Full result of interpreting a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub intent: Intent,
    /// Lowercased transcript that was classified
    pub transcript: String,
    pub feedback_text: String,
    pub speech_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_target: Option<NavigationTarget>,
}

impl CommandOutcome {
    /// Badge text shown next to the feedback
    pub fn label(&self) -> String {
        if self.intent.is_known() {
            format!("Command: {}", self.intent)
        } else {
            "Unrecognized Command".to_string()
        }
    }
}
