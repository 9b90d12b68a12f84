//! Chat session
//!
//! Keeps the message history of the health chatbot. A sent message gets its
//! reply only after the thinking delay, via a [`TimerEvent::ChatReply`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use super::{RequestId, TimerEvent};
use crate::config::AssistantConfig;
use crate::responder::KeywordResponder;
use crate::scheduler::{Scheduler, TimerId};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the chat history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp,
        }
    }
}

/// Reasons a message was not sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    /// A reply is still pending
    #[error("Still answering {0}")]
    Busy(RequestId),
}

/// Message history plus the pending-reply state
#[derive(Debug, Clone)]
pub struct ChatSession {
    responder: KeywordResponder,
    greeting: String,
    thinking_delay: Duration,
    autosend_delay: Duration,
    messages: Vec<ChatMessage>,
    pending: Option<RequestId>,
    listening: bool,
    next_request: u64,
}

impl ChatSession {
    /// Start a session; the history begins with the greeting
    pub fn new(responder: KeywordResponder, config: &AssistantConfig, now: DateTime<Utc>) -> Self {
        let greeting = config.greeting.clone();
        Self {
            responder,
            messages: vec![ChatMessage::new(Role::Assistant, greeting.clone(), now)],
            greeting,
            thinking_delay: config.thinking_delay(),
            autosend_delay: config.autosend_delay(),
            pending: None,
            listening: false,
            next_request: 1,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn responder(&self) -> &KeywordResponder {
        &self.responder
    }

    /// Whether a reply is being "generated"
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The request whose reply is still outstanding
    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub(crate) fn set_listening(&mut self, listening: bool) {
        self.listening = listening;
    }

    /// Record a user message and schedule the reply
    pub fn send_message(
        &mut self,
        scheduler: &mut dyn Scheduler<TimerEvent>,
        input: &str,
    ) -> Result<RequestId, ChatError> {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if let Some(pending) = self.pending {
            return Err(ChatError::Busy(pending));
        }

        let request = RequestId(self.next_request);
        self.next_request += 1;

        self.messages
            .push(ChatMessage::new(Role::User, input, scheduler.now()));
        self.pending = Some(request);

        scheduler.schedule(
            self.thinking_delay,
            TimerEvent::ChatReply {
                request,
                query: input.to_string(),
            },
        );

        tracing::info!(request = %request, "Chat message queued");
        Ok(request)
    }

    /// Schedule a voice transcript to be sent after the auto-send pause
    pub fn submit_transcript(
        &mut self,
        scheduler: &mut dyn Scheduler<TimerEvent>,
        transcript: &str,
    ) -> TimerId {
        scheduler.schedule(
            self.autosend_delay,
            TimerEvent::VoiceAutoSend {
                transcript: transcript.to_string(),
            },
        )
    }

    /// Produce the reply for a finished thinking timer
    ///
    /// Returns `None` for a reply that no longer belongs to this session,
    /// e.g. after [`clear`](Self::clear).
    pub fn complete_reply(
        &mut self,
        request: RequestId,
        query: &str,
        now: DateTime<Utc>,
    ) -> Option<ChatMessage> {
        if self.pending != Some(request) {
            tracing::debug!(request = %request, "Dropping stale chat reply");
            return None;
        }

        let message = ChatMessage::new(Role::Assistant, self.responder.respond(query), now);
        self.messages.push(message.clone());
        self.pending = None;
        Some(message)
    }

    /// Reset the history to the greeting and forget any pending reply
    pub fn clear(&mut self, now: DateTime<Utc>) {
        self.messages = vec![ChatMessage::new(Role::Assistant, self.greeting.clone(), now)];
        self.pending = None;
    }
}
