pub(crate) mod poller;
pub mod state;
pub(crate) mod worker;

use serde::Serialize;

pub use state::{AdvanceOutcome, SessionMode, SessionState};

/// Notifications pushed to whoever is rendering the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum SyncEvent {
    /// Playback reached the end of a line and was paused for input.
    LineReached { line_index: usize },
    /// The last line was committed; nothing further will be polled.
    SequenceComplete,
    /// The playback clock failed mid-session; polling has stopped.
    ClockLost,
}
