//! Assistant Sessions
//!
//! Conversational state around the two interpreters:
//!
//! - **Chat**: message history, the "thinking" delay, voice auto-send
//! - **Commands**: last transcript/outcome, delayed navigation
//! - **Assistant**: wires both to a [`Scheduler`](crate::scheduler::Scheduler)
//!   and to the speech capabilities
//!
//! Sessions never perform side effects. They schedule [`TimerEvent`]s and
//! return [`Effect`]s; the caller speaks, navigates and renders.

mod assistant;
mod chat;
mod commands;

pub use assistant::{Assistant, VoiceChatError};
pub use chat::{ChatError, ChatMessage, ChatSession, Role};
pub use commands::CommandSession;

use serde::Serialize;
use std::fmt;

use crate::intent::NavigationTarget;
use crate::speech::Utterance;

/// Identity of one chat send or one command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Payload of the assistant's timers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The simulated model finished "thinking" about a chat message
    ChatReply { request: RequestId, query: String },
    /// A voice transcript is ready to be sent as a chat message
    VoiceAutoSend { transcript: String },
    /// The navigation delay after a command elapsed
    Navigate {
        request: RequestId,
        target: NavigationTarget,
    },
}

/// Side effect requested from the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Play text through speech synthesis
    Speak { utterance: Utterance },
    /// Switch the dashboard to a view
    Navigate { target: NavigationTarget },
    /// Show a new assistant chat message
    Reply { message: ChatMessage },
}
