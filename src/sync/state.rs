use serde::{Deserialize, Serialize};

/// Whether playback is running or the engine is holding for an answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    Playing,
    AwaitingInput,
}

impl Default for SessionMode {
    fn default() -> Self {
        SessionMode::Playing
    }
}

/// Result of an advance command.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum AdvanceOutcome {
    /// Moved on to the given line; playback should resume.
    Resumed { next_line_index: usize },
    /// Already on the last line; playback stays paused.
    Completed,
    /// No line was awaiting input; nothing changed.
    NotAwaiting,
}

/// Mutable per-video session state. Exactly one instance exists per loaded
/// transcript; loading a new video replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub mode: SessionMode,
    pub current_line_index: usize,
    pub draft_input: String,
    /// Set once the current draft has met the similarity threshold.
    pub answered: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: SessionMode::Playing,
            current_line_index: 0,
            draft_input: String::new(),
            answered: false,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Playing → AwaitingInput, once the line's boundary has been observed.
    pub fn hold_for_input(&mut self) {
        self.mode = SessionMode::AwaitingInput;
    }

    /// AwaitingInput → Playing. Only an explicit command drives this
    /// transition, never the clock. At the last line the index stays put and
    /// the terminal outcome is returned instead.
    pub fn advance(&mut self, line_count: usize) -> AdvanceOutcome {
        if self.mode != SessionMode::AwaitingInput {
            return AdvanceOutcome::NotAwaiting;
        }

        if self.current_line_index + 1 >= line_count {
            return AdvanceOutcome::Completed;
        }

        self.current_line_index += 1;
        self.draft_input.clear();
        self.answered = false;
        self.mode = SessionMode::Playing;

        AdvanceOutcome::Resumed {
            next_line_index: self.current_line_index,
        }
    }
}
