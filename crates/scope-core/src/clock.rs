//! Millisecond playback clock reconciled against a whole-second position.
//!
//! The host player only reports its position in whole seconds and only when
//! it feels like it. The clock advances by frame deltas while playing and
//! snaps back to `seconds * 1000` whenever its own whole-second reading
//! disagrees. Up to 999 ms of drift is tolerated.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockStep {
    Advanced,
    Resynced { playing: bool },
}

#[derive(Clone, Debug, Default)]
pub struct PlaybackClock {
    internal_ms: f64,
    last_timestamp_ms: Option<f64>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn millis(&self) -> f64 {
        self.internal_ms
    }

    #[inline]
    pub fn seconds(&self) -> f64 {
        self.internal_ms / 1000.0
    }

    /// Elapsed wall time since the previous frame. The first frame and
    /// backwards timestamps yield zero.
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let dt = match self.last_timestamp_ms {
            Some(prev) => (timestamp_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp_ms = Some(timestamp_ms);
        dt
    }

    pub fn reconcile(&mut self, playing: bool, external_secs: u32, dt_ms: f64) -> ClockStep {
        if playing {
            self.internal_ms += dt_ms;
        }
        let whole = (self.internal_ms / 1000.0).floor();
        if whole != f64::from(external_secs) {
            log::trace!(
                "[clock] resync {:.0}ms -> {}s (playing={})",
                self.internal_ms,
                external_secs,
                playing
            );
            self.internal_ms = f64::from(external_secs) * 1000.0;
            return ClockStep::Resynced { playing };
        }
        ClockStep::Advanced
    }
}
