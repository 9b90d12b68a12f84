//! Scripted recognizer
//!
//! Replays a fixed queue of recognition results, one per `listen` call.
//! Useful for demos and for driving sessions in tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{SpeechError, SpeechRecognizer, SpeechResult};

/// Recognizer that returns queued results in order
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    script: Mutex<VecDeque<SpeechResult<Option<String>>>>,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: queue a transcript
    pub fn transcript(self, text: impl Into<String>) -> Self {
        self.push(Ok(Some(text.into())));
        self
    }

    /// Builder method: queue a session that ends without a result
    pub fn silence(self) -> Self {
        self.push(Ok(None));
        self
    }

    /// Builder method: queue a recognition failure
    pub fn failure(self, code: impl Into<String>) -> Self {
        self.push(Err(SpeechError::recognition(code, "")));
        self
    }

    fn push(&self, result: SpeechResult<Option<String>>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(result);
        }
    }

    /// Results not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn listen(&self) -> SpeechResult<Option<String>> {
        let next = self
            .script
            .lock()
            .map_err(|e| SpeechError::recognition("aborted", e.to_string()))?
            .pop_front();
        // An exhausted script behaves like a session with no speech
        next.unwrap_or_else(|| Err(SpeechError::recognition("no-speech", "")))
    }
}
