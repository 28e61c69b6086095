use std::time::{Duration, Instant};

/// Wall-clock position of the loaded track.
///
/// `accumulated` holds everything played before the last resume (plus the
/// seek offset the track was loaded at); `started_at` is set while playing.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlaybackClock {
    /// A paused clock positioned at `offset`.
    pub fn starting_at(offset: Duration) -> Self {
        Self {
            started_at: None,
            accumulated: offset,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn resume(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }

    /// Where a relative seek of `delta_secs` from the position at `now`
    /// lands, kept within `[0, total]` (no upper bound when `total` is unknown).
    pub fn seek_target(&self, now: Instant, delta_secs: i32, total: Option<Duration>) -> Duration {
        let current = self.elapsed(now);
        let step = Duration::from_secs(u64::from(delta_secs.unsigned_abs()));
        let target = if delta_secs < 0 {
            current.saturating_sub(step)
        } else {
            current.saturating_add(step)
        };
        total.map_or(target, |t| target.min(t))
    }

    /// Jump to `target`, staying in the running or paused state.
    pub fn seek_to(&mut self, now: Instant, target: Duration) {
        let running = self.is_running();
        *self = Self::starting_at(target);
        if running {
            self.resume(now);
        }
    }
}
