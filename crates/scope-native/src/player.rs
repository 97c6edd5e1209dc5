//! Scripted stand-in for the host's audio element.

use scope_core::PlaybackObserver;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerEvent {
    Pause,
    Resume,
    Seek(f64),
}

/// Event applied before frame `frame` is rendered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledEvent {
    pub frame: u64,
    pub event: PlayerEvent,
}

/// `"FRAME:SECS"`.
pub fn parse_seek(s: &str) -> Result<ScheduledEvent, String> {
    let (frame, secs) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:SECS, got {:?}", s))?;
    let frame = frame
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad frame {:?}: {}", frame, e))?;
    let secs = secs
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad seconds {:?}: {}", secs, e))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("seek target must be a non-negative number, got {}", secs));
    }
    Ok(ScheduledEvent {
        frame,
        event: PlayerEvent::Seek(secs),
    })
}

#[derive(Debug)]
struct PlayerState {
    url: String,
    playing: bool,
    position: f64,
    duration: f64,
}

/// Shared handle; the driver mutates it, the visualizer reads it.
#[derive(Clone, Debug)]
pub struct SimulatedPlayer(Rc<RefCell<PlayerState>>);

impl SimulatedPlayer {
    pub fn new(url: &str, duration: f64, start_at: f64) -> Self {
        Self(Rc::new(RefCell::new(PlayerState {
            url: url.to_string(),
            playing: true,
            position: start_at.clamp(0.0, duration.max(0.0)),
            duration: duration.max(0.0),
        })))
    }

    pub fn position(&self) -> f64 {
        self.0.borrow().position
    }

    pub fn apply(&self, event: PlayerEvent) {
        let mut s = self.0.borrow_mut();
        match event {
            PlayerEvent::Pause => s.playing = false,
            PlayerEvent::Resume => s.playing = s.position < s.duration,
            PlayerEvent::Seek(secs) => s.position = secs.clamp(0.0, s.duration),
        }
        log::info!(
            "[player] {:?} -> playing={} at {:.2}s",
            event,
            s.playing,
            s.position
        );
    }

    /// Advance the playhead; stops at the end like a media element.
    pub fn advance(&self, dt_secs: f64) {
        let mut s = self.0.borrow_mut();
        if !s.playing {
            return;
        }
        s.position += dt_secs;
        if s.position >= s.duration {
            s.position = s.duration;
            s.playing = false;
            log::info!("[player] ended");
        }
    }
}

impl PlaybackObserver for SimulatedPlayer {
    fn is_playing(&self) -> bool {
        self.0.borrow().playing
    }

    fn position_secs(&self) -> u32 {
        let p = self.0.borrow().position;
        if p.is_finite() && p > 0.0 {
            p.floor() as u32
        } else {
            0
        }
    }

    fn source_url(&self) -> String {
        self.0.borrow().url.clone()
    }
}
