//! # healthdash
//!
//! The assistant logic of a health-tracking dashboard: a keyword-matched
//! health chatbot and a keyword-matched voice-command router.
//!
//! ## Features
//!
//! - **Health-query responder**: ordered keyword table, last match wins
//! - **Intent classifier**: ordered term groups, first group wins
//! - **Injectable scheduler**: virtual time for tests, tokio timers for real use
//! - **Speech seams**: capability query, recognizer and synthesizer traits
//!
//! ## Modules
//!
//! - [`responder`]: keyword table and substring matcher
//! - [`intent`]: command classification and response texts
//! - [`scheduler`]: timers behind the simulated delays
//! - [`speech`]: speech-to-text / text-to-speech adapters
//! - [`session`]: chat and command sessions, and the [`Assistant`] facade
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use healthdash::{Assistant, Config, Effect, StaticCapabilities, VirtualScheduler};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let mut assistant = Assistant::new(
//!     &Config::default(),
//!     VirtualScheduler::new(),
//!     Arc::new(StaticCapabilities::all()),
//! )
//! .unwrap();
//!
//! // Speech is requested right away
//! let (outcome, effects) = assistant.command("Open my profile settings");
//! assert_eq!(outcome.feedback_text, "Opening your profile settings.");
//! assert_eq!(effects.len(), 1);
//!
//! // Navigation follows after the configured delay
//! let effects = assistant.advance(Duration::from_secs(2));
//! assert!(matches!(effects[0], Effect::Navigate { .. }));
//! ```

pub mod config;
pub mod intent;
pub mod responder;
pub mod scheduler;
pub mod session;
pub mod speech;

// Re-export top-level types for convenience
pub use responder::{
    respond, KeywordEntry, KeywordResponder, KeywordTable, Reply, ResponderError,
    FALLBACK_RESPONSE, GREETING,
};

pub use intent::{classify, interpret, CommandOutcome, Intent, IntentClassifier, NavigationTarget};

pub use scheduler::{Scheduler, TimerId, TokioScheduler, VirtualScheduler};

pub use speech::{
    LogSynthesizer, ScriptedRecognizer, SpeechCapabilities, SpeechError, SpeechRecognizer,
    SpeechResult, SpeechSynthesizer, StaticCapabilities, StdinRecognizer, Utterance,
};

pub use session::{
    Assistant, ChatError, ChatMessage, ChatSession, CommandSession, Effect, RequestId, Role,
    TimerEvent, VoiceChatError,
};

pub use config::{
    AssistantConfig, CommandConfig, Config, ConfigError, LoggingConfig, SpeechConfig,
};
