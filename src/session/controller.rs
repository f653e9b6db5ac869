use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::{AdvancePolicy, SessionConfig};
use crate::matching::{normalize, similarity};
use crate::player::PlaybackClock;
use crate::sync::poller::sync_loop;
use crate::sync::state::{AdvanceOutcome, SessionMode, SessionState};
use crate::sync::worker::SyncWorker;
use crate::sync::SyncEvent;
use crate::timing::{resolve_boundaries, ResolvedBoundary};
use crate::transcript::{Transcript, TranscriptLine};

/// What a submitted draft did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum SubmitOutcome {
    /// Close enough; the line is marked answered and waits for the commit
    /// keystroke.
    Accepted { similarity: f64 },
    /// Close enough under the immediate policy; the session already moved on.
    AcceptedAndAdvanced {
        similarity: f64,
        advance: AdvanceOutcome,
    },
    /// Not close enough; the session stays exactly where it was.
    Rejected { similarity: f64 },
    /// No line is awaiting an answer right now.
    NotAwaiting,
}

/// Point-in-time view of a session for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub video_id: String,
    pub started_at: DateTime<Utc>,
    pub line_count: usize,
    pub state: SessionState,
}

/// Orchestrates one loaded video: owns the session state, the resolved
/// boundaries, and the polling worker, and dispatches answer checking and
/// advancement.
///
/// Constructed with [`SessionController::start`], which needs a running
/// tokio runtime. Loading a new video means shutting this controller down
/// and starting a fresh one; all per-video state is discarded with it.
pub struct SessionController {
    session_id: String,
    started_at: DateTime<Utc>,
    transcript: Arc<Transcript>,
    boundaries: Arc<Vec<ResolvedBoundary>>,
    state: Arc<Mutex<SessionState>>,
    clock: Arc<dyn PlaybackClock>,
    config: SessionConfig,
    worker: SyncWorker,
    events: UnboundedSender<SyncEvent>,
}

impl SessionController {
    /// Load a transcript against a playback clock and start polling.
    ///
    /// A transcript with zero lines is a valid silent state: the controller
    /// is returned with no poller running and never emits an event.
    pub fn start(
        transcript: Transcript,
        clock: Arc<dyn PlaybackClock>,
        config: SessionConfig,
    ) -> Result<(Self, UnboundedReceiver<SyncEvent>)> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let boundaries = if transcript.is_empty() {
            Vec::new()
        } else {
            let total_duration = clock
                .duration()
                .context("playback clock did not report a duration")?;
            resolve_boundaries(transcript.lines(), total_duration, config.lead_in_secs)
        };

        let mut controller = Self {
            session_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            transcript: Arc::new(transcript),
            boundaries: Arc::new(boundaries),
            state: Arc::new(Mutex::new(SessionState::new())),
            clock,
            config,
            worker: SyncWorker::new(),
            events: events_tx,
        };

        if controller.transcript.is_empty() {
            info!(
                "session {}: transcript has no lines, nothing to poll",
                controller.session_id
            );
            return Ok((controller, events_rx));
        }

        controller.spawn_poller()?;
        info!(
            "session {} started: {} lines for video {}",
            controller.session_id,
            controller.transcript.len(),
            controller.transcript.video_id()
        );

        Ok((controller, events_rx))
    }

    fn spawn_poller(&mut self) -> Result<()> {
        let state = Arc::clone(&self.state);
        let boundaries = Arc::clone(&self.boundaries);
        let clock = Arc::clone(&self.clock);
        let events = self.events.clone();
        let poll_interval = self.config.poll_interval;

        self.worker.start(move |cancel_token| {
            sync_loop(state, boundaries, clock, events, poll_interval, cancel_token)
        })
    }

    /// Check a typed draft against the current line's expected translation.
    ///
    /// Only meaningful while a line is awaiting input. A draft below the
    /// threshold never advances the session, and resubmitting the same
    /// under-threshold text changes nothing.
    pub async fn submit_answer(&mut self, draft: &str) -> Result<SubmitOutcome> {
        let score = {
            let mut state = self.state.lock().await;

            if state.mode != SessionMode::AwaitingInput {
                return Ok(SubmitOutcome::NotAwaiting);
            }

            state.draft_input = draft.to_string();

            let expected = self
                .transcript
                .line(state.current_line_index)
                .context("current line index is out of range")?;
            let score = similarity(&normalize(draft), &normalize(&expected.translated_text));

            if score < self.config.match_threshold {
                return Ok(SubmitOutcome::Rejected { similarity: score });
            }

            state.answered = true;
            score
        };

        match self.config.advance_policy {
            AdvancePolicy::ConfirmThenAdvance => Ok(SubmitOutcome::Accepted { similarity: score }),
            AdvancePolicy::AdvanceOnMatch => {
                let advance = self.advance().await?;
                Ok(SubmitOutcome::AcceptedAndAdvanced {
                    similarity: score,
                    advance,
                })
            }
        }
    }

    /// Commit the current line: the AwaitingInput → Playing transition.
    ///
    /// Resumes playback when another line exists. At the last line the index
    /// stays put, polling stops, and the terminal outcome is returned. A
    /// no-op while playing.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome> {
        let outcome = {
            let mut state = self.state.lock().await;
            state.advance(self.transcript.len())
        };

        match outcome {
            AdvanceOutcome::Resumed { next_line_index } => {
                if let Err(err) = self.clock.resume() {
                    warn!(
                        "session {}: clock went away on resume: {err:#}",
                        self.session_id
                    );
                    self.worker.stop().await?;
                    let _ = self.events.send(SyncEvent::ClockLost);
                    return Err(err.context("failed to resume playback"));
                }
                info!(
                    "session {}: advanced to line {next_line_index}",
                    self.session_id
                );
            }
            AdvanceOutcome::Completed => {
                info!("session {}: all lines answered", self.session_id);
                self.worker.stop().await?;
                let _ = self.events.send(SyncEvent::SequenceComplete);
            }
            AdvanceOutcome::NotAwaiting => {}
        }

        Ok(outcome)
    }

    /// Stop polling. Required on every teardown path, and before a
    /// replacement session may start.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.worker.stop().await
    }

    pub fn is_polling(&self) -> bool {
        self.worker.is_active()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub async fn current_line(&self) -> Option<TranscriptLine> {
        let state = self.state.lock().await;
        self.transcript.line(state.current_line_index).cloned()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            session_id: self.session_id.clone(),
            video_id: self.transcript.video_id().to_string(),
            started_at: self.started_at,
            line_count: self.transcript.len(),
            state: state.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::testing::FakeClock;
    use std::time::Duration;

    fn line(source: &str, translated: &str, start: f64, duration: f64) -> TranscriptLine {
        TranscriptLine {
            source_text: source.to_string(),
            translated_text: translated.to_string(),
            start,
            duration,
        }
    }

    fn single_line_transcript() -> Transcript {
        Transcript::new("vid1", vec![line("hola", "hello", 0.0, 2.0)])
    }

    fn start_session(
        transcript: Transcript,
        clock: Arc<FakeClock>,
        config: SessionConfig,
    ) -> (SessionController, UnboundedReceiver<SyncEvent>) {
        SessionController::start(transcript, clock, config).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_once_at_the_line_boundary() {
        let clock = Arc::new(FakeClock::new(20.0));
        clock.set_position(2.5);
        let (controller, mut events) =
            start_session(single_line_transcript(), clock.clone(), SessionConfig::default());

        assert_eq!(
            events.recv().await,
            Some(SyncEvent::LineReached { line_index: 0 })
        );
        assert_eq!(clock.pause_count(), 1);

        // Let several more polls elapse; no further pause is issued.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(clock.pause_count(), 1);
        assert!(events.try_recv().is_err());

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state.mode, SessionMode::AwaitingInput);
        assert_eq!(snapshot.state.current_line_index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_answers_never_advance() {
        let clock = Arc::new(FakeClock::new(20.0));
        clock.set_position(2.5);
        let (mut controller, mut events) =
            start_session(single_line_transcript(), clock.clone(), SessionConfig::default());
        events.recv().await;

        let outcome = controller.submit_answer("halo").await.unwrap();
        let SubmitOutcome::Rejected { similarity } = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert!(similarity < 0.7);

        // Resubmitting the same wrong text is idempotent.
        let outcome = controller.submit_answer("halo").await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state.mode, SessionMode::AwaitingInput);
        assert_eq!(snapshot.state.current_line_index, 0);
        assert!(!snapshot.state.answered);
        assert_eq!(clock.resume_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_answer_then_commit_completes_a_single_line_video() {
        let clock = Arc::new(FakeClock::new(20.0));
        clock.set_position(2.5);
        let (mut controller, mut events) =
            start_session(single_line_transcript(), clock.clone(), SessionConfig::default());
        events.recv().await;

        // Punctuation and case are forgiven by normalization.
        let outcome = controller.submit_answer("Hello!").await.unwrap();
        let SubmitOutcome::Accepted { similarity } = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_eq!(similarity, 1.0);

        let outcome = controller.advance().await.unwrap();
        assert_eq!(outcome, AdvanceOutcome::Completed);
        assert_eq!(events.recv().await, Some(SyncEvent::SequenceComplete));

        // Terminal: index unchanged, playback still paused, polling stopped.
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state.current_line_index, 0);
        assert_eq!(clock.resume_count(), 0);
        assert!(!controller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn advancing_resumes_playback_and_moves_to_the_next_line() {
        let transcript = Transcript::new(
            "vid2",
            vec![
                line("hola", "hello", 0.0, 2.0),
                line("adiós", "goodbye", 3.0, 2.0),
            ],
        );
        let clock = Arc::new(FakeClock::new(20.0));
        clock.set_position(2.1);
        let (mut controller, mut events) =
            start_session(transcript, clock.clone(), SessionConfig::default());

        assert_eq!(
            events.recv().await,
            Some(SyncEvent::LineReached { line_index: 0 })
        );

        controller.submit_answer("hello").await.unwrap();
        let outcome = controller.advance().await.unwrap();
        assert_eq!(outcome, AdvanceOutcome::Resumed { next_line_index: 1 });
        assert_eq!(clock.resume_count(), 1);

        // The poller picks up the second line's boundary.
        clock.set_position(5.2);
        assert_eq!(
            events.recv().await,
            Some(SyncEvent::LineReached { line_index: 1 })
        );
        assert_eq!(clock.pause_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn advance_on_match_policy_advances_without_a_commit() {
        let config = SessionConfig {
            advance_policy: AdvancePolicy::AdvanceOnMatch,
            ..SessionConfig::default()
        };
        let clock = Arc::new(FakeClock::new(20.0));
        clock.set_position(2.5);
        let (mut controller, mut events) =
            start_session(single_line_transcript(), clock.clone(), config);
        events.recv().await;

        let outcome = controller.submit_answer("hello").await.unwrap();
        let SubmitOutcome::AcceptedAndAdvanced { advance, .. } = outcome else {
            panic!("expected immediate advance, got {outcome:?}");
        };
        assert_eq!(advance, AdvanceOutcome::Completed);
        assert_eq!(events.recv().await, Some(SyncEvent::SequenceComplete));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_transcript_is_silent() {
        let clock = Arc::new(FakeClock::new(20.0));
        let (mut controller, mut events) = start_session(
            Transcript::new("vid3", Vec::new()),
            clock.clone(),
            SessionConfig::default(),
        );

        assert!(!controller.is_polling());
        assert!(events.try_recv().is_err());
        assert_eq!(
            controller.submit_answer("anything").await.unwrap(),
            SubmitOutcome::NotAwaiting
        );
        assert_eq!(
            controller.advance().await.unwrap(),
            AdvanceOutcome::NotAwaiting
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_poller_before_the_boundary_fires() {
        let clock = Arc::new(FakeClock::new(20.0));
        let (mut controller, mut events) =
            start_session(single_line_transcript(), clock.clone(), SessionConfig::default());

        controller.shutdown().await.unwrap();
        assert!(!controller.is_polling());

        // A stale poller would pause here; a stopped one must not.
        clock.set_position(10.0);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(clock.pause_count(), 0);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn losing_the_clock_stops_polling_gracefully() {
        let clock = Arc::new(FakeClock::new(20.0));
        let (controller, mut events) =
            start_session(single_line_transcript(), clock.clone(), SessionConfig::default());

        clock.tear_down();
        assert_eq!(events.recv().await, Some(SyncEvent::ClockLost));

        // The loop exits on its own; no pause was ever issued.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(clock.pause_count(), 0);
        drop(controller);
    }
}
