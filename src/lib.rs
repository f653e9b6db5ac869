//! Playback-synchronized translation practice engine.
//!
//! A video plays line by line; at the end of each spoken line playback
//! pauses so the learner can type a translation, and resumes once the
//! answer is close enough and committed. The pipeline is one-directional:
//! raw transcript timing goes through [`timing::resolve_boundaries`] to
//! become per-line pause points, [`sync`] polls a live [`player::PlaybackClock`]
//! against those points, and [`session::SessionController`] reacts to the
//! resulting events, scoring typed answers with [`matching`].

pub mod config;
pub mod matching;
pub mod player;
pub mod session;
pub mod sync;
pub mod timing;
pub mod transcript;

pub use config::{AdvancePolicy, SessionConfig};
pub use matching::{normalize, similarity, MATCH_THRESHOLD};
pub use player::{PlaybackClock, SimulatedClock};
pub use session::{SessionController, SessionSnapshot, SubmitOutcome};
pub use sync::{AdvanceOutcome, SessionMode, SessionState, SyncEvent};
pub use timing::{resolve_boundaries, ResolvedBoundary};
pub use transcript::{Transcript, TranscriptClient, TranscriptLine};
