//! Analysis graph: a replaceable one-shot source feeding an analyser.

use crate::acquisition::Completion;
use crate::error::GraphError;
use crate::source::{OneShotSource, SourceNode, SourcePhase};
use std::rc::Rc;

/// Platform seam. The web front-end implements this with Web Audio nodes,
/// the native one with a software analyser.
pub trait AudioBackend {
    type Buffer;
    type Source: SourceNode;

    /// Create a fresh source bound to `buffer` and wired into the analyser.
    fn create_source(&mut self, buffer: &Rc<Self::Buffer>) -> Result<Self::Source, GraphError>;

    fn frequency_data(&mut self, out: &mut [u8]);

    fn time_domain_data(&mut self, out: &mut [u8]);

    /// Start fetching and decoding `url`; deliver through `completion`.
    fn acquire(&mut self, url: &str, completion: Completion<Self::Buffer>);

    fn close(&mut self);
}

pub struct AnalysisGraph<A: AudioBackend> {
    backend: A,
    buffer: Option<Rc<A::Buffer>>,
    source: Option<OneShotSource<A::Source, A::Buffer>>,
    generations: u64,
    frequency: Vec<u8>,
    waveform: Vec<u8>,
    closed: bool,
}

impl<A: AudioBackend> AnalysisGraph<A> {
    pub fn new(backend: A, fft_size: usize) -> Self {
        Self {
            backend,
            buffer: None,
            source: None,
            generations: 0,
            frequency: vec![0; fft_size / 2],
            waveform: vec![0; fft_size],
            closed: false,
        }
    }

    #[inline]
    pub fn backend(&self) -> &A {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut A {
        &mut self.backend
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.buffer.is_some()
    }

    #[inline]
    pub fn buffer(&self) -> Option<&Rc<A::Buffer>> {
        self.buffer.as_ref()
    }

    #[inline]
    pub fn source(&self) -> Option<&OneShotSource<A::Source, A::Buffer>> {
        self.source.as_ref()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(&self.source, Some(s) if s.phase() == SourcePhase::Started)
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn acquire(&mut self, url: &str, completion: Completion<A::Buffer>) {
        self.backend.acquire(url, completion);
    }

    /// The buffer is kept only once its first source node exists.
    pub fn bind(&mut self, buffer: A::Buffer) -> Result<(), GraphError> {
        let buffer = Rc::new(buffer);
        let node = self.backend.create_source(&buffer)?;
        self.generations += 1;
        self.source = Some(OneShotSource::new(node, buffer.clone(), self.generations));
        self.buffer = Some(buffer);
        Ok(())
    }

    fn rebuild(&mut self) -> Result<(), GraphError> {
        let Some(buffer) = self.buffer.clone() else {
            return Ok(());
        };
        let node = self.backend.create_source(&buffer)?;
        self.generations += 1;
        self.source = Some(OneShotSource::new(node, buffer, self.generations));
        Ok(())
    }

    /// Start playback into the analyser at `offset_secs`. No-op without data
    /// or when already running.
    pub fn start(&mut self, offset_secs: f64) -> Result<(), GraphError> {
        if self.closed || self.buffer.is_none() || self.is_running() {
            return Ok(());
        }
        let needs_rebuild = match &self.source {
            Some(s) => s.phase() == SourcePhase::Exhausted,
            None => true,
        };
        if needs_rebuild {
            self.rebuild()?;
        }
        match self.source.as_mut() {
            Some(source) => source.start(offset_secs),
            None => Ok(()),
        }
    }

    /// Stop the running node and replace it so a later start can resume.
    pub fn stop(&mut self) {
        let stopped = self.source.as_mut().map(|s| s.stop()).unwrap_or(false);
        if stopped && !self.closed {
            if let Err(e) = self.rebuild() {
                log::warn!("[graph] could not replace source node: {}", e);
            }
        }
    }

    pub fn frequency_snapshot(&mut self) -> Option<&[u8]> {
        if self.buffer.is_none() {
            return None;
        }
        self.backend.frequency_data(&mut self.frequency);
        Some(&self.frequency)
    }

    pub fn time_domain_snapshot(&mut self) -> Option<&[u8]> {
        if self.buffer.is_none() {
            return None;
        }
        self.backend.time_domain_data(&mut self.waveform);
        Some(&self.waveform)
    }

    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        if let Some(source) = self.source.as_mut() {
            source.stop();
        }
        self.closed = true;
        self.backend.close();
        true
    }
}
