use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::player::PlaybackClock;
use crate::sync::state::{SessionMode, SessionState};
use crate::sync::SyncEvent;
use crate::timing::ResolvedBoundary;

/// What one poll of the playback position did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PollStep {
    /// A line is already awaiting input; the clock was not sampled.
    Idle,
    /// Sampled the clock; the current line's boundary is still ahead.
    Running,
    /// Boundary crossed: playback paused, session now awaiting input.
    Paused,
    /// The clock failed; polling must stop.
    ClockLost,
}

/// One boundary check against the live playback position.
///
/// Sampling only happens while the session is in `Playing` mode, so clock
/// drift during `AwaitingInput` can never retrigger the boundary. Crossing
/// the boundary issues exactly one `pause`.
pub(crate) async fn poll_once(
    state: &Mutex<SessionState>,
    boundaries: &[ResolvedBoundary],
    clock: &dyn PlaybackClock,
    events: &UnboundedSender<SyncEvent>,
) -> PollStep {
    let mut guard = state.lock().await;

    if guard.mode != SessionMode::Playing {
        return PollStep::Idle;
    }

    let Some(boundary) = boundaries.get(guard.current_line_index) else {
        // Unreachable while the line-index invariant holds; treat a bad
        // index as idle rather than sampling against nothing.
        return PollStep::Idle;
    };

    let position = match clock.current_time() {
        Ok(position) => position,
        Err(err) => {
            warn!("playback clock read failed: {err:#}");
            return PollStep::ClockLost;
        }
    };

    if position < boundary.effective_end {
        return PollStep::Running;
    }

    if let Err(err) = clock.pause() {
        warn!(
            "failed to pause playback at line {}: {err:#}",
            boundary.line_index
        );
        return PollStep::ClockLost;
    }

    guard.hold_for_input();
    let _ = events.send(SyncEvent::LineReached {
        line_index: boundary.line_index,
    });

    PollStep::Paused
}

/// The recurring boundary check for one loaded transcript.
///
/// Runs until cancelled or until the clock goes away. Replacing the
/// transcript must cancel this loop first; a stale poller firing against the
/// wrong line index is the primary correctness hazard of the design.
pub(crate) async fn sync_loop(
    state: Arc<Mutex<SessionState>>,
    boundaries: Arc<Vec<ResolvedBoundary>>,
    clock: Arc<dyn PlaybackClock>,
    events: UnboundedSender<SyncEvent>,
    poll_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match poll_once(&state, &boundaries, clock.as_ref(), &events).await {
                    PollStep::Idle | PollStep::Running | PollStep::Paused => {}
                    PollStep::ClockLost => {
                        let _ = events.send(SyncEvent::ClockLost);
                        break;
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                debug!("sync loop shutting down");
                break;
            }
        }
    }
}
