//! Terminal speech adapters
//!
//! Stand-ins for real speech services when running from a shell: the
//! "recognizer" reads a typed line and the "synthesizer" prints.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use super::{SpeechError, SpeechRecognizer, SpeechResult, SpeechSynthesizer, Utterance};

/// Reads one line from standard input per listening session
pub struct StdinRecognizer {
    lines: Mutex<tokio::io::Lines<BufReader<tokio::io::Stdin>>>,
}

impl StdinRecognizer {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdinRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechRecognizer for StdinRecognizer {
    async fn listen(&self) -> SpeechResult<Option<String>> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => Ok(None),
            Ok(Some(line)) => Ok(Some(line.trim().to_string())),
            Ok(None) => Err(SpeechError::recognition("aborted", "input closed")),
            Err(e) => Err(SpeechError::recognition("audio-capture", e.to_string())),
        }
    }
}

/// Prints utterances instead of playing them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSynthesizer;

impl SpeechSynthesizer for LogSynthesizer {
    fn speak(&self, utterance: &Utterance) {
        tracing::debug!(
            lang = %utterance.lang,
            rate = utterance.rate,
            pitch = utterance.pitch,
            volume = utterance.volume,
            "Speaking"
        );
        println!("(speaking) {}", utterance.text);
    }

    fn cancel(&self) {
        tracing::debug!("Speech cancelled");
    }
}
