// Host-side doubles for the engine's platform seams.

#![allow(dead_code)]

use glam::Vec2;
use scope_core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, PartialEq)]
pub struct MockBuffer {
    pub id: u32,
}

#[derive(Default)]
pub struct BackendLog {
    pub acquired: Vec<String>,
    pub pending: Vec<Completion<MockBuffer>>,
    pub created: u64,
    pub create_calls: u32,
    pub fail_create: bool,
    pub starts: Vec<(u64, f64)>,
    pub stops: Vec<u64>,
    pub closes: u32,
    pub bins: Vec<u8>,
    pub waveform: Vec<u8>,
}

/// Test-side handle onto the backend's call log.
#[derive(Clone, Default)]
pub struct BackendHandle(pub Rc<RefCell<BackendLog>>);

impl BackendHandle {
    pub fn acquire_count(&self) -> usize {
        self.0.borrow().acquired.len()
    }

    pub fn acquired_urls(&self) -> Vec<String> {
        self.0.borrow().acquired.clone()
    }

    pub fn close_count(&self) -> u32 {
        self.0.borrow().closes
    }

    pub fn starts(&self) -> Vec<(u64, f64)> {
        self.0.borrow().starts.clone()
    }

    pub fn stops(&self) -> Vec<u64> {
        self.0.borrow().stops.clone()
    }

    /// Resolve the oldest in-flight fetch.
    pub fn deliver(&self, result: Result<MockBuffer, AcquisitionError>) {
        let completion = self.0.borrow_mut().pending.remove(0);
        completion.complete(result);
    }

    pub fn create_calls(&self) -> u32 {
        self.0.borrow().create_calls
    }

    /// Make every later `create_source` fail.
    pub fn fail_create(&self) {
        self.0.borrow_mut().fail_create = true;
    }

    pub fn set_bins(&self, bins: Vec<u8>) {
        self.0.borrow_mut().bins = bins;
    }

    pub fn set_waveform(&self, waveform: Vec<u8>) {
        self.0.borrow_mut().waveform = waveform;
    }
}

pub struct MockSource {
    id: u64,
    log: BackendHandle,
}

impl SourceNode for MockSource {
    fn start(&mut self, offset_secs: f64) -> Result<(), GraphError> {
        self.log.0.borrow_mut().starts.push((self.id, offset_secs));
        Ok(())
    }

    fn stop(&mut self) {
        self.log.0.borrow_mut().stops.push(self.id);
    }
}

pub struct MockBackend {
    pub log: BackendHandle,
}

pub fn mock_backend() -> (MockBackend, BackendHandle) {
    let log = BackendHandle::default();
    (MockBackend { log: log.clone() }, log)
}

impl AudioBackend for MockBackend {
    type Buffer = MockBuffer;
    type Source = MockSource;

    fn create_source(&mut self, _buffer: &Rc<MockBuffer>) -> Result<MockSource, GraphError> {
        let mut log = self.log.0.borrow_mut();
        log.create_calls += 1;
        if log.fail_create {
            return Err(GraphError::CreateSource("context suspended".into()));
        }
        log.created += 1;
        Ok(MockSource {
            id: log.created,
            log: self.log.clone(),
        })
    }

    fn frequency_data(&mut self, out: &mut [u8]) {
        let log = self.log.0.borrow();
        for (i, b) in out.iter_mut().enumerate() {
            *b = log.bins.get(i).copied().unwrap_or(0);
        }
    }

    fn time_domain_data(&mut self, out: &mut [u8]) {
        let log = self.log.0.borrow();
        for (i, b) in out.iter_mut().enumerate() {
            *b = log.waveform.get(i).copied().unwrap_or(128);
        }
    }

    fn acquire(&mut self, url: &str, completion: Completion<MockBuffer>) {
        let mut log = self.log.0.borrow_mut();
        log.acquired.push(url.to_string());
        log.pending.push(completion);
    }

    fn close(&mut self) {
        self.log.0.borrow_mut().closes += 1;
    }
}

/// Records what was painted since the last clear.
#[derive(Default)]
pub struct MockSurface {
    pub width: f32,
    pub height: f32,
    pub clears: u32,
    pub bars: Vec<[f32; 4]>,
    pub polylines: Vec<Vec<Vec2>>,
}

impl MockSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Surface for MockSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.bars.clear();
        self.polylines.clear();
    }

    fn fill_bar(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.bars.push([x, y, w, h]);
    }

    fn stroke_polyline(&mut self, points: &[Vec2]) {
        self.polylines.push(points.to_vec());
    }
}

/// Player state the test flips between frames.
#[derive(Clone, Default)]
pub struct MockPlayer {
    playing: Rc<Cell<bool>>,
    position: Rc<Cell<u32>>,
}

impl MockPlayer {
    pub fn set(&self, playing: bool, position_secs: u32) {
        self.playing.set(playing);
        self.position.set(position_secs);
    }

    pub fn play(&self) {
        self.playing.set(true);
    }

    pub fn pause(&self) {
        self.playing.set(false);
    }
}

impl PlaybackObserver for MockPlayer {
    fn is_playing(&self) -> bool {
        self.playing.get()
    }

    fn position_secs(&self) -> u32 {
        self.position.get()
    }

    fn source_url(&self) -> String {
        "https://cdn.example/track.mp3".to_string()
    }
}

pub type MockInstance = VisualizerInstance<MockBackend, MockSurface, MockPlayer>;

pub struct Harness {
    pub instance: MockInstance,
    pub backend: BackendHandle,
    pub player: MockPlayer,
}

pub fn harness(config: VisualizerConfig) -> Harness {
    let (backend, handle) = mock_backend();
    let player = MockPlayer::default();
    let instance = VisualizerInstance::with_seed(
        config,
        backend,
        MockSurface::new(220.0, 100.0),
        player.clone(),
        7,
    )
    .expect("valid config");
    Harness {
        instance,
        backend: handle,
        player,
    }
}
