//! Voice command session

use std::time::Duration;

use super::{RequestId, TimerEvent};
use crate::config::CommandConfig;
use crate::intent::{CommandOutcome, IntentClassifier, NavigationTarget};
use crate::scheduler::{Scheduler, TimerId};

/// Last command state plus pending navigation
#[derive(Debug, Clone)]
pub struct CommandSession {
    classifier: IntentClassifier,
    navigation_delay: Duration,
    supersede_pending: bool,
    listening: bool,
    last: Option<CommandOutcome>,
    pending_navigation: Option<(RequestId, TimerId)>,
    next_request: u64,
}

impl CommandSession {
    pub fn new(classifier: IntentClassifier, config: &CommandConfig) -> Self {
        Self {
            classifier,
            navigation_delay: config.navigation_delay(),
            supersede_pending: config.supersede_pending,
            listening: false,
            last: None,
            pending_navigation: None,
            next_request: 1,
        }
    }

    /// Outcome of the most recent command, if any
    pub fn last(&self) -> Option<&CommandOutcome> {
        self.last.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Enter listening mode; clears the previous transcript and feedback
    pub fn begin_listening(&mut self) {
        self.listening = true;
        self.last = None;
    }

    pub fn end_listening(&mut self) {
        self.listening = false;
    }

    /// Classify a transcript and schedule navigation for known intents
    pub fn process(
        &mut self,
        scheduler: &mut dyn Scheduler<TimerEvent>,
        transcript: &str,
    ) -> CommandOutcome {
        let request = RequestId(self.next_request);
        self.next_request += 1;

        let outcome = self.classifier.interpret(transcript);

        if let Some(target) = outcome.navigation_target {
            if self.supersede_pending {
                if let Some((previous, timer)) = self.pending_navigation.take() {
                    if scheduler.cancel(timer) {
                        tracing::info!(request = %previous, "Superseded pending navigation");
                    }
                }
            }

            let timer = scheduler.schedule(
                self.navigation_delay,
                TimerEvent::Navigate { request, target },
            );
            self.pending_navigation = Some((request, timer));
        }

        tracing::info!(
            request = %request,
            intent = %outcome.intent,
            "Command processed"
        );

        self.last = Some(outcome.clone());
        outcome
    }

    /// Acknowledge a fired navigation timer
    pub fn complete_navigation(
        &mut self,
        request: RequestId,
        target: NavigationTarget,
    ) -> NavigationTarget {
        if matches!(self.pending_navigation, Some((pending, _)) if pending == request) {
            self.pending_navigation = None;
        }
        tracing::info!(request = %request, target = %target, "Navigating");
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;
    use crate::scheduler::VirtualScheduler;

    fn navigations(events: Vec<TimerEvent>) -> Vec<NavigationTarget> {
        events
            .into_iter()
            .filter_map(|event| match event {
                TimerEvent::Navigate { target, .. } => Some(target),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_navigation_after_delay() {
        let mut sched = VirtualScheduler::new();
        let mut session =
            CommandSession::new(IntentClassifier::builtin(), &CommandConfig::default());

        let outcome = session.process(&mut sched, "Schedule an appointment");
        assert_eq!(outcome.intent, Intent::Appointment);
        assert_eq!(session.last(), Some(&outcome));

        assert!(sched.advance(Duration::from_millis(1999)).is_empty());
        assert_eq!(
            navigations(sched.advance(Duration::from_millis(1))),
            vec![NavigationTarget::Appointments]
        );
    }

    #[test]
    fn test_unknown_does_not_navigate() {
        let mut sched = VirtualScheduler::new();
        let mut session =
            CommandSession::new(IntentClassifier::builtin(), &CommandConfig::default());

        session.process(&mut sched, "xyzzy");
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_quick_commands_both_navigate() {
        let mut sched = VirtualScheduler::new();
        let mut session =
            CommandSession::new(IntentClassifier::builtin(), &CommandConfig::default());

        session.process(&mut sched, "open profile");
        sched.advance(Duration::from_millis(500));
        session.process(&mut sched, "show my stats");

        assert_eq!(
            navigations(sched.run_until_idle()),
            vec![NavigationTarget::Profile, NavigationTarget::Dashboard]
        );
    }

    #[test]
    fn test_supersede_cancels_previous() {
        let mut sched = VirtualScheduler::new();
        let config = CommandConfig {
            supersede_pending: true,
            ..CommandConfig::default()
        };
        let mut session = CommandSession::new(IntentClassifier::builtin(), &config);

        session.process(&mut sched, "open profile");
        sched.advance(Duration::from_millis(500));
        session.process(&mut sched, "show my stats");

        assert_eq!(
            navigations(sched.run_until_idle()),
            vec![NavigationTarget::Dashboard]
        );
    }

    #[test]
    fn test_listening_resets_last() {
        let mut sched = VirtualScheduler::new();
        let mut session =
            CommandSession::new(IntentClassifier::builtin(), &CommandConfig::default());

        session.process(&mut sched, "medication");
        session.begin_listening();
        assert!(session.is_listening());
        assert!(session.last().is_none());

        session.end_listening();
        assert!(!session.is_listening());
    }
}
