//! In-process audio graph: decoded WAV -> playhead -> software analyser.

use crate::analyser::SoftwareAnalyser;
use scope_core::{AcquisitionError, AudioBackend, Completion, GraphError, SourceNode};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

/// Mono samples in `[-1, 1]`.
#[derive(Debug)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate.max(1))
    }

    /// The `len` samples ending at `end` (exclusive), zero-padded where they
    /// fall outside the buffer.
    pub fn window_ending_at(&self, end: i64, len: usize, out: &mut Vec<f32>) {
        out.clear();
        let start = end - len as i64;
        out.extend((start..end).map(|i| {
            usize::try_from(i)
                .ok()
                .and_then(|i| self.samples.get(i))
                .copied()
                .unwrap_or(0.0)
        }));
    }
}

/// Decode a WAV file and downmix to mono.
pub fn decode_wav(path: &Path) -> Result<DecodedAudio, AcquisitionError> {
    let mut reader = hound::WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => AcquisitionError::Fetch {
            url: path.display().to_string(),
            reason: io.to_string(),
        },
        other => AcquisitionError::Decode(other.to_string()),
    })?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));
    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| AcquisitionError::Decode(e.to_string()))?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()
                .map_err(|e| AcquisitionError::Decode(e.to_string()))?
        }
    };
    let samples = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();
    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

#[derive(Debug)]
struct Playhead {
    buffer: Rc<DecodedAudio>,
    offset_secs: f64,
    started_at_secs: f64,
    generation: u64,
}

type ActiveSlot = Rc<RefCell<Option<Playhead>>>;

/// Render-time context clock, advanced by the frame driver.
#[derive(Clone, Debug, Default)]
pub struct ContextClock(Rc<Cell<f64>>);

impl ContextClock {
    pub fn set_secs(&self, secs: f64) {
        self.0.set(secs);
    }

    pub fn secs(&self) -> f64 {
        self.0.get()
    }
}

pub struct SoftwareSource {
    buffer: Rc<DecodedAudio>,
    active: ActiveSlot,
    clock: ContextClock,
    generation: u64,
}

impl SourceNode for SoftwareSource {
    fn start(&mut self, offset_secs: f64) -> Result<(), GraphError> {
        log::debug!(
            "[graph] source #{} start at {:.3}s",
            self.generation,
            offset_secs
        );
        *self.active.borrow_mut() = Some(Playhead {
            buffer: self.buffer.clone(),
            offset_secs,
            started_at_secs: self.clock.secs(),
            generation: self.generation,
        });
        Ok(())
    }

    fn stop(&mut self) {
        let mut active = self.active.borrow_mut();
        if active.as_ref().map(|p| p.generation) == Some(self.generation) {
            *active = None;
        }
    }
}

pub struct SoftwareBackend {
    analyser: SoftwareAnalyser,
    active: ActiveSlot,
    clock: ContextClock,
    window: Vec<f32>,
    next_generation: u64,
}

impl SoftwareBackend {
    pub fn new(fft_size: usize, clock: ContextClock) -> Self {
        Self {
            analyser: SoftwareAnalyser::new(fft_size),
            active: Rc::new(RefCell::new(None)),
            clock,
            window: Vec::with_capacity(fft_size),
            next_generation: 0,
        }
    }

    /// Fill `self.window` with the samples under the playhead.
    fn fill_window(&mut self, len: usize) {
        let active = self.active.borrow();
        match active.as_ref() {
            Some(p) => {
                let pos = p.offset_secs + (self.clock.secs() - p.started_at_secs);
                let end = (pos * f64::from(p.buffer.sample_rate)).floor() as i64;
                p.buffer.window_ending_at(end, len, &mut self.window);
            }
            None => {
                self.window.clear();
                self.window.resize(len, 0.0);
            }
        }
    }
}

impl AudioBackend for SoftwareBackend {
    type Buffer = DecodedAudio;
    type Source = SoftwareSource;

    fn create_source(&mut self, buffer: &Rc<DecodedAudio>) -> Result<SoftwareSource, GraphError> {
        self.next_generation += 1;
        Ok(SoftwareSource {
            buffer: buffer.clone(),
            active: self.active.clone(),
            clock: self.clock.clone(),
            generation: self.next_generation,
        })
    }

    fn frequency_data(&mut self, out: &mut [u8]) {
        let len = self.analyser.fft_size();
        self.fill_window(len);
        self.analyser.frequency_bytes(&self.window, out);
    }

    fn time_domain_data(&mut self, out: &mut [u8]) {
        self.fill_window(out.len());
        SoftwareAnalyser::time_domain_bytes(&self.window, out);
    }

    fn acquire(&mut self, url: &str, completion: Completion<DecodedAudio>) {
        let result = decode_wav(Path::new(url));
        if let Ok(audio) = &result {
            log::info!(
                "[acquire] decoded {:.1}s at {}Hz from {}",
                audio.duration_secs(),
                audio.sample_rate,
                url
            );
        }
        completion.complete(result);
    }

    fn close(&mut self) {
        self.active.borrow_mut().take();
        log::debug!("[graph] context closed");
    }
}
