//! Conversation state machine.
//!
//! The engine is stateless between calls: all mutable conversation state
//! lives in the [`Session`] handed in by the caller, and the script registry
//! is shared read-only. Exactly one event per session may be in flight at a
//! time; the application layer serializes them.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::script::{Action, ScriptRegistry, Step};
use crate::ports::IntentClassifier;

use super::event::{InputEvent, Turn};
use super::session::Session;
use super::silence::{SilencePolicy, SilenceVerdict};

/// Engine-wide knobs, all configurable.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Step a fresh session starts in.
    pub entry_step: String,
    /// Step an exit phrase routes to when it exists.
    pub exit_step: String,
    /// Phrases that end the conversation, compared case-sensitively against
    /// the trimmed utterance.
    pub exit_phrases: Vec<String>,
    /// Spoken when the conversation ends without a scripted farewell.
    pub farewell_text: String,
    /// Spoken when the silence policy terminates the conversation.
    pub silence_end_text: String,
    /// Spoken when a step exhausts its actions with nowhere left to go.
    pub no_followup_text: String,
    /// Hard cap on one classifier call.
    pub classifier_wait: Duration,
    /// Ceiling on chained fallback transitions within a single turn, so a
    /// `Default` cycle cannot spin forever.
    pub max_fallback_hops: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            entry_step: "welcome".to_string(),
            exit_step: "exitProc".to_string(),
            exit_phrases: ["再见", "退出", "exit", "quit", "没有"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            farewell_text: "再见！感谢您的使用。".to_string(),
            silence_end_text: "长时间未收到回复，本次会话已结束。".to_string(),
            no_followup_text: "当前流程已结束，感谢您的使用。".to_string(),
            classifier_wait: Duration::from_secs(15),
            max_fallback_hops: 8,
        }
    }
}

/// What scanning one step's actions produced.
enum StepOutcome {
    /// Hit a `Listen`: wait for the next event in this step.
    Listening,
    /// Hit an `Exit`: the conversation is over.
    Ended,
    /// Ran out of actions without `Listen` or `Exit`.
    FellThrough,
}

/// Drives sessions through a loaded script.
pub struct ConversationEngine {
    registry: Arc<ScriptRegistry>,
    classifier: Arc<dyn IntentClassifier>,
    settings: EngineSettings,
}

impl ConversationEngine {
    pub fn new(
        registry: Arc<ScriptRegistry>,
        classifier: Arc<dyn IntentClassifier>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            registry,
            classifier,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Opens a conversation: a fresh session positioned at the entry step,
    /// plus the turn produced by executing it.
    pub fn start(&self, now: DateTime<Utc>) -> (Session, Turn) {
        let mut session = Session::new(&self.settings.entry_step, now);
        let turn = self.run_from(&mut session, &self.settings.entry_step, now);
        (session, turn)
    }

    /// Processes one event for an existing session. Whitespace-only text is
    /// treated as an idle tick.
    pub async fn process(&self, session: &mut Session, event: InputEvent) -> Turn {
        match event.trimmed_text() {
            Some(text) => self.handle_text(session, text, event.now).await,
            None => self.handle_idle(session, event.now),
        }
    }

    async fn handle_text(&self, session: &mut Session, text: &str, now: DateTime<Utc>) -> Turn {
        session.note_user_activity(now);

        if self.settings.exit_phrases.iter().any(|p| p == text) {
            if self.registry.contains(&self.settings.exit_step) {
                return self.run_from(session, &self.settings.exit_step, now);
            }
            let farewell = vec![self.settings.farewell_text.clone()];
            return self.finish(session, now, farewell, true, false);
        }

        let Some(step) = self.registry.get(&session.current_step) else {
            warn!(step = %session.current_step, "session rests in an undefined step, ending conversation");
            let farewell = vec![self.settings.farewell_text.clone()];
            return self.finish(session, now, farewell, true, false);
        };

        // First match by declaration order, substring containment. Authors
        // rely on the ordering to shadow broader keywords.
        if let Some((_, target)) = step.branches().find(|(keyword, _)| text.contains(keyword)) {
            return self.run_from(session, target, now);
        }

        let candidates: Vec<String> = step.branches().map(|(k, _)| k.to_string()).collect();
        if !candidates.is_empty() {
            if let Some(label) = self.classify_bounded(text, &candidates).await {
                if let Some((_, target)) = step.branches().find(|(keyword, _)| *keyword == label) {
                    return self.run_from(session, target, now);
                }
                warn!(%label, "classifier answered outside the candidate set, ignoring");
            }
        }

        match step.default_target() {
            Some(target) => self.run_from(session, target, now),
            None => {
                warn!(step = %step.name, "no branch matched and the step has no fallback, ending conversation");
                let diagnostic = vec![self.settings.no_followup_text.clone()];
                self.finish(session, now, diagnostic, true, false)
            }
        }
    }

    fn handle_idle(&self, session: &mut Session, now: DateTime<Utc>) -> Turn {
        let policy = self.policy_for(&session.current_step);
        let span_start = *session
            .total_silence_started_at
            .get_or_insert(session.last_interaction_at);
        let since_last = now - session.last_interaction_at;
        let total_elapsed = now - span_start;

        match policy.judge(since_last, total_elapsed) {
            SilenceVerdict::Quiet => self.finish(session, now, Vec::new(), false, true),
            SilenceVerdict::Remind => {
                session.note_reminder(now);
                match self.silence_target_of(&session.current_step) {
                    Some(target) => self.run_from(session, &target, now),
                    None => {
                        let diagnostic = vec![self.settings.silence_end_text.clone()];
                        self.finish(session, now, diagnostic, true, false)
                    }
                }
            }
            SilenceVerdict::Terminate => {
                let Some(target) = self.silence_target_of(&session.current_step) else {
                    let diagnostic = vec![self.settings.silence_end_text.clone()];
                    return self.finish(session, now, diagnostic, true, false);
                };
                // If the destination would itself hard-timeout on arrival,
                // follow its own silence edge, but only one extra hop.
                let mut destination = target;
                if let Some(next_step) = self.registry.get(&destination) {
                    let next_policy = SilencePolicy::for_step(next_step);
                    if total_elapsed >= next_policy.total {
                        if let Some(next_target) = next_step.silence_target() {
                            destination = next_target.to_string();
                        }
                    }
                }
                self.run_from(session, &destination, now)
            }
        }
    }

    /// Transitions into `target` and executes steps until the conversation
    /// listens or ends, chasing fallback edges as needed.
    fn run_from(&self, session: &mut Session, target: &str, now: DateTime<Utc>) -> Turn {
        let mut messages = Vec::new();
        let mut current = target.to_string();
        let mut hops = 0u32;

        let ended = loop {
            let Some(step) = self.registry.get(&current) else {
                warn!(step = %current, "transition names an undefined step, ending conversation");
                messages.push(self.settings.farewell_text.clone());
                break true;
            };
            session.current_step = step.name.clone();

            match Self::execute_step(step, &mut messages) {
                StepOutcome::Listening => break false,
                StepOutcome::Ended => break true,
                StepOutcome::FellThrough => match step.default_target() {
                    Some(next) => {
                        hops += 1;
                        if hops > self.settings.max_fallback_hops {
                            warn!(step = %current, hops, "fallback chain hit the hop ceiling, ending conversation");
                            messages.push(self.settings.no_followup_text.clone());
                            break true;
                        }
                        current = next.to_string();
                    }
                    None => {
                        messages.push(self.settings.no_followup_text.clone());
                        break true;
                    }
                },
            }
        };

        self.finish(session, now, messages, ended, false)
    }

    /// Scans one step's actions in declaration order. Identical `Speak` text
    /// within a single invocation is emitted once.
    fn execute_step(step: &Step, messages: &mut Vec<String>) -> StepOutcome {
        let mut spoken: HashSet<&str> = HashSet::new();
        for action in &step.actions {
            match action {
                Action::Speak { message } => {
                    if spoken.insert(message.as_str()) {
                        messages.push(message.clone());
                    }
                }
                Action::Listen { .. } => return StepOutcome::Listening,
                Action::Exit => return StepOutcome::Ended,
                Action::Branch { .. } | Action::Default { .. } | Action::Silence { .. } => {}
            }
        }
        StepOutcome::FellThrough
    }

    async fn classify_bounded(&self, text: &str, candidates: &[String]) -> Option<String> {
        match tokio::time::timeout(
            self.settings.classifier_wait,
            self.classifier.classify(text, candidates),
        )
        .await
        {
            Ok(Ok(label)) => label,
            Ok(Err(err)) => {
                warn!(error = %err, "intent classifier failed, treating as no match");
                None
            }
            Err(_) => {
                warn!(
                    wait_secs = self.settings.classifier_wait.as_secs(),
                    "intent classifier exceeded its wait budget, treating as no match"
                );
                None
            }
        }
    }

    fn policy_for(&self, step_name: &str) -> SilencePolicy {
        self.registry
            .get(step_name)
            .map(SilencePolicy::for_step)
            .unwrap_or_default()
    }

    fn silence_target_of(&self, step_name: &str) -> Option<String> {
        self.registry
            .get(step_name)
            .and_then(Step::silence_target)
            .map(str::to_string)
    }

    /// Builds the outgoing turn from the session's resting position.
    fn finish(
        &self,
        session: &Session,
        now: DateTime<Utc>,
        messages: Vec<String>,
        ended: bool,
        no_op: bool,
    ) -> Turn {
        let policy = self.policy_for(&session.current_step);
        let total_secs = policy.total.num_seconds().max(0) as u64;
        let remaining = match session.total_silence_started_at {
            Some(start) => {
                let elapsed = (now - start).num_milliseconds().max(0) as f64 / 1000.0;
                (total_secs as f64 - elapsed).max(0.0)
            }
            None => total_secs as f64,
        };

        Turn {
            messages,
            ended,
            current_step: session.current_step.clone(),
            reminder_timeout_ms: policy.reminder.num_milliseconds().max(0) as u64,
            total_silence_timeout_secs: total_secs,
            remaining_total_silence_secs: remaining,
            no_op,
            silence_count: session.silence_count,
        }
    }
}
