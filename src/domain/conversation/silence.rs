//! Dual-timeout silence policy.
//!
//! Two clocks run while the user is quiet: a soft clock since the last
//! interaction (a fired reminder restarts it) and a hard clock since the
//! silence span began (only user input clears it). When both thresholds are
//! crossed at once the hard timeout wins.

use chrono::Duration;

use crate::domain::script::{Step, DEFAULT_REMINDER_SECS, DEFAULT_TOTAL_SILENCE_SECS};

/// The two thresholds in force while a step listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilencePolicy {
    pub reminder: Duration,
    pub total: Duration,
}

/// What an idle tick calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SilenceVerdict {
    /// Neither threshold crossed; the tick is a no-op.
    Quiet,
    /// Soft threshold crossed: fire a reminder and restart the soft clock.
    Remind,
    /// Hard threshold crossed: the silence path ends or redirects the
    /// conversation.
    Terminate,
}

impl SilencePolicy {
    pub fn from_secs(reminder_secs: u64, total_secs: u64) -> Self {
        Self {
            reminder: Duration::seconds(reminder_secs as i64),
            total: Duration::seconds(total_secs as i64),
        }
    }

    /// The policy a step imposes: its `Listen` timeouts, or the defaults when
    /// the step has no `Listen`.
    pub fn for_step(step: &Step) -> Self {
        let (reminder, total) = step
            .listen_timeouts()
            .unwrap_or((DEFAULT_REMINDER_SECS, DEFAULT_TOTAL_SILENCE_SECS));
        Self::from_secs(reminder, total)
    }

    /// Judges an idle tick given the elapsed soft and hard clocks.
    pub fn judge(&self, since_last: Duration, total_elapsed: Duration) -> SilenceVerdict {
        if total_elapsed >= self.total {
            SilenceVerdict::Terminate
        } else if since_last >= self.reminder {
            SilenceVerdict::Remind
        } else {
            SilenceVerdict::Quiet
        }
    }
}

impl Default for SilencePolicy {
    fn default() -> Self {
        Self::from_secs(DEFAULT_REMINDER_SECS, DEFAULT_TOTAL_SILENCE_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    #[test]
    fn below_both_thresholds_is_quiet() {
        let policy = SilencePolicy::from_secs(10, 30);
        assert_eq!(policy.judge(secs(9), secs(9)), SilenceVerdict::Quiet);
    }

    #[test]
    fn soft_threshold_alone_fires_a_reminder() {
        let policy = SilencePolicy::from_secs(10, 30);
        assert_eq!(policy.judge(secs(10), secs(10)), SilenceVerdict::Remind);
        assert_eq!(policy.judge(secs(12), secs(29)), SilenceVerdict::Remind);
    }

    #[test]
    fn hard_threshold_terminates() {
        let policy = SilencePolicy::from_secs(10, 30);
        assert_eq!(policy.judge(secs(5), secs(30)), SilenceVerdict::Terminate);
    }

    #[test]
    fn hard_timeout_outranks_a_simultaneous_reminder() {
        let policy = SilencePolicy::from_secs(30, 30);
        assert_eq!(policy.judge(secs(30), secs(30)), SilenceVerdict::Terminate);
    }

    #[test]
    fn inverted_thresholds_never_remind() {
        // reminder > total: the hard clock always crosses first.
        let policy = SilencePolicy::from_secs(40, 10);
        assert_eq!(policy.judge(secs(9), secs(9)), SilenceVerdict::Quiet);
        assert_eq!(policy.judge(secs(10), secs(10)), SilenceVerdict::Terminate);
    }
}
