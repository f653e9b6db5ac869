use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use anyhow::Result;

/// Read-and-command capability over an externally owned playback surface.
///
/// The engine only samples the position and issues pause/resume from within
/// its state-machine transitions; it never owns the player. Every call is
/// fallible so a torn-down player is representable; the engine treats a
/// failure as the signal to stop polling.
pub trait PlaybackClock: Send + Sync {
    /// Current playback position in seconds.
    fn current_time(&self) -> Result<f64>;

    /// Total playback length in seconds.
    fn duration(&self) -> Result<f64>;

    fn pause(&self) -> Result<()>;

    fn resume(&self) -> Result<()>;
}

struct ClockInner {
    /// Position accumulated from earlier playing windows; combines with
    /// `playing_anchor` to compute the live position.
    position_baseline: f64,
    playing_anchor: Option<Instant>,
}

/// In-process clock whose position advances with wall time while playing.
///
/// Starts paused at zero; `resume` begins playback. The position clamps to
/// the configured duration, so it behaves like a finite video.
pub struct SimulatedClock {
    duration: f64,
    inner: Mutex<ClockInner>,
}

impl SimulatedClock {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            inner: Mutex::new(ClockInner {
                position_baseline: 0.0,
                playing_anchor: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClockInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn position(inner: &ClockInner, duration: f64) -> f64 {
        let live = match inner.playing_anchor {
            Some(anchor) => inner.position_baseline + anchor.elapsed().as_secs_f64(),
            None => inner.position_baseline,
        };
        live.min(duration)
    }
}

impl PlaybackClock for SimulatedClock {
    fn current_time(&self) -> Result<f64> {
        let inner = self.lock();
        Ok(Self::position(&inner, self.duration))
    }

    fn duration(&self) -> Result<f64> {
        Ok(self.duration)
    }

    fn pause(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.position_baseline = Self::position(&inner, self.duration);
        inner.playing_anchor = None;
        Ok(())
    }

    fn resume(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.playing_anchor.is_none() {
            inner.playing_anchor = Some(Instant::now());
        }
        Ok(())
    }
}
