//! Assistant facade
//!
//! Owns the scheduler and both sessions, applies the speech capability
//! checks, and turns fired timers into [`Effect`]s.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::{ChatError, ChatSession, CommandSession, Effect, RequestId, TimerEvent};
use crate::config::{Config, ConfigError, SpeechConfig};
use crate::intent::{CommandOutcome, IntentClassifier};
use crate::scheduler::{Scheduler, TimerId, VirtualScheduler};
use crate::speech::{SpeechCapabilities, SpeechError, SpeechRecognizer, SpeechResult, Utterance};

/// Reasons a spoken chat message was not taken
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceChatError {
    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Chat and command sessions driven by one scheduler
pub struct Assistant<S> {
    scheduler: S,
    chat: ChatSession,
    commands: CommandSession,
    capabilities: Arc<dyn SpeechCapabilities>,
    voice: SpeechConfig,
    /// Auto-sent transcripts that arrived while a reply was pending
    deferred: VecDeque<String>,
}

impl<S: Scheduler<TimerEvent>> Assistant<S> {
    /// Build an assistant from configuration
    pub fn new(
        config: &Config,
        scheduler: S,
        capabilities: Arc<dyn SpeechCapabilities>,
    ) -> Result<Self, ConfigError> {
        let responder = config.assistant.responder()?;
        let chat = ChatSession::new(responder, &config.assistant, scheduler.now());
        let commands = CommandSession::new(IntentClassifier::builtin(), &config.commands);

        Ok(Self {
            scheduler,
            chat,
            commands,
            capabilities,
            voice: config.speech.clone(),
            deferred: VecDeque::new(),
        })
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn commands(&self) -> &CommandSession {
        &self.commands
    }

    fn recognition_available(&self) -> bool {
        self.voice.recognition_enabled && self.capabilities.recognition_supported()
    }

    fn synthesis_available(&self) -> bool {
        self.voice.synthesis_enabled && self.capabilities.synthesis_supported()
    }

    /// Send a typed chat message; the reply arrives as an [`Effect::Reply`]
    pub fn ask(&mut self, input: &str) -> Result<RequestId, ChatError> {
        self.chat.send_message(&mut self.scheduler, input)
    }

    /// Handle a typed or transcribed command
    ///
    /// Returns the outcome and the immediate effects (speech). Navigation
    /// follows later through [`dispatch`](Self::dispatch).
    pub fn command(&mut self, transcript: &str) -> (CommandOutcome, Vec<Effect>) {
        let outcome = self.commands.process(&mut self.scheduler, transcript);

        let mut effects = Vec::new();
        if self.synthesis_available() {
            effects.push(Effect::Speak {
                utterance: Utterance::new(outcome.speech_text.clone()).voice(&self.voice),
            });
        }

        (outcome, effects)
    }

    /// Listen for one spoken command and process it
    ///
    /// `Ok(None)` means the session ended without a transcript.
    pub async fn listen_command(
        &mut self,
        recognizer: &dyn SpeechRecognizer,
    ) -> SpeechResult<Option<(CommandOutcome, Vec<Effect>)>> {
        if !self.recognition_available() {
            return Err(SpeechError::NotSupported);
        }

        self.commands.begin_listening();
        let heard = recognizer.listen().await;
        self.commands.end_listening();

        match heard {
            Ok(Some(transcript)) => Ok(Some(self.command(&transcript.to_lowercase()))),
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::warn!("Command recognition failed: {}", e);
                Err(e)
            }
        }
    }

    /// Listen for a spoken chat message and schedule its auto-send
    ///
    /// Refused with [`ChatError::Busy`] while a reply is pending, the same
    /// as typed input.
    pub async fn listen_chat(
        &mut self,
        recognizer: &dyn SpeechRecognizer,
    ) -> Result<Option<TimerId>, VoiceChatError> {
        if !self.recognition_available() {
            return Err(SpeechError::NotSupported.into());
        }
        if let Some(pending) = self.chat.pending() {
            return Err(ChatError::Busy(pending).into());
        }

        self.chat.set_listening(true);
        let heard = recognizer.listen().await;
        self.chat.set_listening(false);

        match heard {
            Ok(Some(transcript)) => Ok(Some(
                self.chat.submit_transcript(&mut self.scheduler, &transcript),
            )),
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::warn!("Chat recognition failed: {}", e);
                Err(e.into())
            }
        }
    }

    fn send_voice(&mut self, transcript: String) {
        match self.chat.send_message(&mut self.scheduler, &transcript) {
            Ok(_) => {}
            Err(ChatError::Busy(pending)) => {
                tracing::debug!(request = %pending, "Deferring voice message");
                self.deferred.push_back(transcript);
            }
            Err(e) => tracing::warn!("Voice message not sent: {}", e),
        }
    }

    /// Apply a fired timer
    pub fn dispatch(&mut self, event: TimerEvent) -> Vec<Effect> {
        match event {
            TimerEvent::ChatReply { request, query } => {
                let now = self.scheduler.now();
                let effects: Vec<Effect> = self
                    .chat
                    .complete_reply(request, &query, now)
                    .map(|message| Effect::Reply { message })
                    .into_iter()
                    .collect();

                if !self.chat.is_loading() {
                    if let Some(transcript) = self.deferred.pop_front() {
                        self.send_voice(transcript);
                    }
                }
                effects
            }
            TimerEvent::VoiceAutoSend { transcript } => {
                self.send_voice(transcript);
                Vec::new()
            }
            TimerEvent::Navigate { request, target } => {
                let target = self.commands.complete_navigation(request, target);
                vec![Effect::Navigate { target }]
            }
        }
    }
}

impl Assistant<VirtualScheduler<TimerEvent>> {
    /// Advance virtual time and apply every timer that fired
    ///
    /// Timers scheduled by the dispatched events themselves are applied too
    /// if they fall within the same window.
    pub fn advance(&mut self, by: Duration) -> Vec<Effect> {
        let target = self.scheduler.elapsed().saturating_add(by);
        let mut effects = Vec::new();

        while let Some(wait) = self.scheduler.next_deadline() {
            let now = self.scheduler.elapsed();
            if now.saturating_add(wait) > target {
                break;
            }
            for event in self.scheduler.advance(wait) {
                effects.extend(self.dispatch(event));
            }
        }

        let rest = target.saturating_sub(self.scheduler.elapsed());
        for event in self.scheduler.advance(rest) {
            effects.extend(self.dispatch(event));
        }

        effects
    }
}
