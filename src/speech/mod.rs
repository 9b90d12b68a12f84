//! Speech I/O
//!
//! The assistant consumes transcripts and emits text to speak; the platform
//! speech services sit behind three seams:
//!
//! - [`SpeechCapabilities`]: whether recognition/synthesis exist at all
//! - [`SpeechRecognizer`]: produces at most one final transcript per session
//! - [`SpeechSynthesizer`]: plays an [`Utterance`], fire-and-forget
//!
//! Adapters:
//!
//! - [`StdinRecognizer`]: reads a typed "transcript" from standard input
//! - [`LogSynthesizer`]: logs and prints what would be spoken
//! - [`ScriptedRecognizer`]: replays queued results

mod console;
mod scripted;

pub use console::{LogSynthesizer, StdinRecognizer};
pub use scripted::ScriptedRecognizer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a speech recognizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// The runtime has no speech recognition
    #[error("Voice recognition is not supported in this environment")]
    NotSupported,

    /// Recognition started but failed; the session is over
    #[error("Speech recognition error: {code}{}", detail(.message))]
    Recognition { code: String, message: String },
}

impl SpeechError {
    pub fn recognition(code: impl Into<String>, message: impl Into<String>) -> Self {
        SpeechError::Recognition {
            code: code.into(),
            message: message.into(),
        }
    }
}

fn detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(" ({})", message)
    }
}

/// Result type for speech operations
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Capability query for the speech services
pub trait SpeechCapabilities: Send + Sync {
    fn recognition_supported(&self) -> bool;
    fn synthesis_supported(&self) -> bool;
}

/// Fixed capability answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticCapabilities {
    pub recognition: bool,
    pub synthesis: bool,
}

impl StaticCapabilities {
    pub fn all() -> Self {
        Self {
            recognition: true,
            synthesis: true,
        }
    }

    pub fn none() -> Self {
        Self {
            recognition: false,
            synthesis: false,
        }
    }
}

impl Default for StaticCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl SpeechCapabilities for StaticCapabilities {
    fn recognition_supported(&self) -> bool {
        self.recognition
    }

    fn synthesis_supported(&self) -> bool {
        self.synthesis
    }
}

/// Speech-to-text source
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen for one utterance
    ///
    /// Returns `Ok(None)` when the session ended without a final result.
    async fn listen(&self) -> SpeechResult<Option<String>>;
}

/// Text-to-speech sink
pub trait SpeechSynthesizer: Send + Sync {
    /// Start speaking; does not wait for playback
    fn speak(&self, utterance: &Utterance);

    /// Stop anything currently queued or playing
    fn cancel(&self);
}

/// Text plus voice parameters for synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    /// Create an utterance with default voice parameters
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }

    /// Builder method: apply voice parameters from configuration
    pub fn voice(mut self, voice: &crate::config::SpeechConfig) -> Self {
        self.lang = voice.lang.clone();
        self.rate = voice.rate;
        self.pitch = voice.pitch;
        self.volume = voice.volume;
        self
    }
}
