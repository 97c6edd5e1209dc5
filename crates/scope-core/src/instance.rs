//! One visualizer per audio attachment.
//!
//! The host drives [`VisualizerInstance::frame`] once per display refresh and
//! re-arms its frame callback while it returns `true`.

use crate::acquisition::{Acquisition, AcquisitionPhase};
use crate::clock::{ClockStep, PlaybackClock};
use crate::config::VisualizerConfig;
use crate::constants::OSCILLOSCOPE_STRIDE;
use crate::error::ConfigError;
use crate::graph::{AnalysisGraph, AudioBackend};
use crate::levels::{SampleStrategy, SpectrumLevels};
use crate::render::{draw_spectrum, oscilloscope_points, Surface};
use glam::Vec2;

/// Read-only view of the host's player. The host mutates the underlying
/// state; the instance only samples it.
pub trait PlaybackObserver {
    fn is_playing(&self) -> bool;
    /// Current position in whole seconds.
    fn position_secs(&self) -> u32;
    fn source_url(&self) -> String;
}

pub struct VisualizerInstance<A, S, P>
where
    A: AudioBackend,
    S: Surface,
    P: PlaybackObserver,
{
    config: VisualizerConfig,
    surface: S,
    observer: P,
    graph: AnalysisGraph<A>,
    acquisition: Acquisition<A::Buffer>,
    clock: PlaybackClock,
    levels: SpectrumLevels,
    was_playing: bool,
    alive: bool,
    scope_points: Vec<Vec2>,
}

impl<A, S, P> VisualizerInstance<A, S, P>
where
    A: AudioBackend,
    S: Surface,
    P: PlaybackObserver,
{
    pub fn new(config: VisualizerConfig, backend: A, surface: S, observer: P) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let acquisition = Acquisition::new(config.retry.clone());
        Ok(Self::assemble(config, backend, surface, observer, acquisition))
    }

    pub fn with_seed(
        config: VisualizerConfig,
        backend: A,
        surface: S,
        observer: P,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let acquisition = Acquisition::with_seed(config.retry.clone(), seed);
        Ok(Self::assemble(config, backend, surface, observer, acquisition))
    }

    fn assemble(
        config: VisualizerConfig,
        backend: A,
        surface: S,
        observer: P,
        acquisition: Acquisition<A::Buffer>,
    ) -> Self {
        let graph = AnalysisGraph::new(backend, config.fft_size());
        let levels = SpectrumLevels::new(config.segment_count);
        log::debug!(
            "[instance] created: segments={} fft={} surface={}x{}",
            config.segment_count,
            config.fft_size(),
            surface.width(),
            surface.height()
        );
        Self {
            config,
            surface,
            observer,
            graph,
            acquisition,
            clock: PlaybackClock::new(),
            levels,
            was_playing: false,
            alive: true,
            scope_points: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn levels(&self) -> &SpectrumLevels {
        &self.levels
    }

    #[inline]
    pub fn clock_ms(&self) -> f64 {
        self.clock.millis()
    }

    #[inline]
    pub fn acquisition_phase(&self) -> AcquisitionPhase {
        self.acquisition.phase()
    }

    #[inline]
    pub fn acquisition_attempts(&self) -> u32 {
        self.acquisition.attempts()
    }

    #[inline]
    pub fn graph(&self) -> &AnalysisGraph<A> {
        &self.graph
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    pub fn observer(&self) -> &P {
        &self.observer
    }

    /// Run one frame at `timestamp_ms`. Returns whether another frame should
    /// be scheduled.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        if !self.alive {
            return false;
        }
        let dt = self.clock.tick(timestamp_ms);
        let playing = self.observer.is_playing();
        let position = self.observer.position_secs();

        // A correction while playing means the running source is at a stale
        // offset: stop it and treat this frame as a fresh play start.
        if let ClockStep::Resynced { playing: true } = self.clock.reconcile(playing, position, dt) {
            self.graph.stop();
            self.was_playing = false;
        }

        self.collect_acquisition(timestamp_ms);
        self.surface.clear();

        if playing {
            if !self.was_playing {
                self.begin_acquisition();
            } else if let Some(completion) = self.acquisition.retry_due(timestamp_ms) {
                let url = self.acquisition.url().to_string();
                self.graph.acquire(&url, completion);
            }
            if self.graph.has_data() && !self.graph.is_running() {
                if let Err(e) = self.graph.start(self.clock.seconds()) {
                    log::warn!("[instance] could not start source: {}", e);
                }
            }
            self.update_levels();
        } else if self.was_playing {
            self.graph.stop();
        }
        self.was_playing = playing;

        if self.config.show_spectrograph {
            draw_spectrum(&mut self.surface, &self.levels);
        }
        self.levels.decay(self.config.fall_speed);

        if playing && self.config.show_oscilloscope {
            self.draw_oscilloscope();
        }
        self.alive
    }

    fn begin_acquisition(&mut self) {
        if self.acquisition.is_started() {
            return;
        }
        let url = self.observer.source_url();
        if let Some(completion) = self.acquisition.begin(&url) {
            log::info!("[acquire] fetching {}", url);
            self.graph.acquire(&url, completion);
        }
    }

    fn collect_acquisition(&mut self, now_ms: f64) {
        if let Some(buffer) = self.acquisition.poll(now_ms) {
            if let Err(e) = self.graph.bind(buffer) {
                self.acquisition.abandon(&e);
            }
        }
    }

    fn update_levels(&mut self) {
        let n = self.config.segment_count;
        let strategy = match self.graph.frequency_snapshot() {
            Some(bins) => SampleStrategy::Real {
                bins,
                normal_bin_index: self.config.normal_bin_index(),
            },
            None => SampleStrategy::Synthetic {
                clock_ms: self.clock.millis(),
            },
        };
        for i in 0..n {
            let candidate = strategy.candidate(i, n, &self.config.tuning);
            self.levels.raise(i, candidate);
        }
    }

    fn draw_oscilloscope(&mut self) {
        let width = self.surface.width();
        let height = self.surface.height();
        let Some(samples) = self.graph.time_domain_snapshot() else {
            return;
        };
        oscilloscope_points(
            samples,
            width,
            height,
            OSCILLOSCOPE_STRIDE,
            &mut self.scope_points,
        );
        self.surface.stroke_polyline(&self.scope_points);
    }

    /// Stop scheduling and release the audio context. Safe to call any
    /// number of times.
    pub fn destroy(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        if self.graph.close() {
            log::debug!("[instance] destroyed");
        }
    }
}

impl<A, S, P> Drop for VisualizerInstance<A, S, P>
where
    A: AudioBackend,
    S: Surface,
    P: PlaybackObserver,
{
    fn drop(&mut self) {
        self.destroy();
    }
}
