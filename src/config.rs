use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::matching::MATCH_THRESHOLD;

/// How an accepted answer turns into playback resuming.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AdvancePolicy {
    /// An accepted answer marks the line answered; a separate commit
    /// keystroke triggers the advance.
    ConfirmThenAdvance,
    /// An accepted answer advances and resumes playback immediately.
    AdvanceOnMatch,
}

impl Default for AdvancePolicy {
    fn default() -> Self {
        AdvancePolicy::ConfirmThenAdvance
    }
}

/// Tunables for one practice session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cadence at which the playback position is sampled while playing.
    /// Pause precision is bounded below by this interval.
    pub poll_interval: Duration,

    /// Gap, in seconds, left before the next line's speech when two lines
    /// overlap in the source timing.
    pub lead_in_secs: f64,

    /// Minimum normalized similarity for a typed answer to be accepted.
    pub match_threshold: f64,

    pub advance_policy: AdvancePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            lead_in_secs: 0.2,
            match_threshold: MATCH_THRESHOLD,
            advance_policy: AdvancePolicy::default(),
        }
    }
}
