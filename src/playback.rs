use scope_core::PlaybackObserver;
use std::cell::Cell;
use std::rc::Rc;

/// Latest play state pushed by the host player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub playing: bool,
    pub position_secs: u32,
}

/// Host-written, engine-read playback state for one attachment.
#[derive(Clone, Debug)]
pub struct SharedPlayback {
    state: Rc<Cell<PlaybackSnapshot>>,
    url: Rc<str>,
}

impl SharedPlayback {
    pub fn new(url: &str) -> Self {
        Self {
            state: Rc::new(Cell::new(PlaybackSnapshot::default())),
            url: Rc::from(url),
        }
    }

    pub fn set(&self, playing: bool, current_time: f64) {
        self.state.set(PlaybackSnapshot {
            playing,
            position_secs: whole_seconds(current_time),
        });
    }

    #[inline]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.get()
    }
}

impl PlaybackObserver for SharedPlayback {
    fn is_playing(&self) -> bool {
        self.state.get().playing
    }

    fn position_secs(&self) -> u32 {
        self.state.get().position_secs
    }

    fn source_url(&self) -> String {
        self.url.to_string()
    }
}

/// Players report `currentTime` as a float in some builds and as whole
/// seconds in others; the engine only wants whole seconds.
#[inline]
pub fn whole_seconds(current_time: f64) -> u32 {
    if !current_time.is_finite() || current_time <= 0.0 {
        return 0;
    }
    current_time.floor().min(f64::from(u32::MAX)) as u32
}
