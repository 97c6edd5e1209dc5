//! Per-instance configuration.
//!
//! A `VisualizerConfig` is built once by the host when an attachment is
//! admitted and is never re-read mid-instance. Nothing here is global.

use crate::admission::AdmissionPolicy;
use crate::constants::*;
use crate::error::ConfigError;
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
pub enum ColorSpec {
    /// A CSS custom property on the host's root element, e.g. `--text-normal`.
    Theme { property: String, fallback: String },
    Literal(String),
}

impl ColorSpec {
    pub fn theme(property: &str, fallback: &str) -> Self {
        Self::Theme {
            property: property.to_string(),
            fallback: fallback.to_string(),
        }
    }

    /// Resolve to a concrete color string. `lookup` reads a theme property;
    /// empty or missing values fall back.
    pub fn resolve<F>(&self, lookup: F) -> String
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match self {
            Self::Literal(color) => color.trim().to_string(),
            Self::Theme { property, fallback } => lookup(property)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.clone()),
        }
    }
}

/// Empirically tuned spectrum constants, kept as data so they can be adjusted.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumTuning {
    pub magnitude_scale: f32,
    pub emphasis_divisor: f32,
    pub normal_bin_index_narrow: f32,
    pub normal_bin_index_wide: f32,
    pub idle_time_divisor: f32,
    pub idle_phase_divisor: f32,
    pub idle_amplitude: f32,
    pub idle_offset: f32,
}

impl Default for SpectrumTuning {
    fn default() -> Self {
        Self {
            magnitude_scale: MAGNITUDE_SCALE,
            emphasis_divisor: EMPHASIS_DIVISOR,
            normal_bin_index_narrow: NORMAL_BIN_INDEX_NARROW,
            normal_bin_index_wide: NORMAL_BIN_INDEX_WIDE,
            idle_time_divisor: IDLE_TIME_DIVISOR,
            idle_phase_divisor: IDLE_PHASE_DIVISOR,
            idle_amplitude: IDLE_AMPLITUDE,
            idle_offset: IDLE_OFFSET,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: f64,
    pub max_delay_ms: f64,
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
            jitter: DEFAULT_RETRY_JITTER,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before the next attempt after `failures` consecutive failures.
    pub fn delay_ms<R: Rng>(&self, failures: u32, rng: &mut R) -> f64 {
        let exp = failures.saturating_sub(1).min(16);
        let base = (self.base_delay_ms * f64::from(1u32 << exp)).min(self.max_delay_ms);
        if self.jitter <= 0.0 {
            return base;
        }
        let spread = base * self.jitter;
        (base + rng.gen_range(-spread..=spread)).max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerConfig {
    pub segment_count: usize,
    pub show_spectrograph: bool,
    pub show_oscilloscope: bool,
    pub fall_speed: f32,
    pub spectrograph_color: ColorSpec,
    pub oscilloscope_color: ColorSpec,
    pub admission: AdmissionPolicy,
    pub tuning: SpectrumTuning,
    pub retry: RetryPolicy,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            segment_count: DEFAULT_SEGMENT_COUNT,
            show_spectrograph: true,
            show_oscilloscope: true,
            fall_speed: DEFAULT_FALL_SPEED,
            spectrograph_color: ColorSpec::theme(
                SPECTROGRAPH_THEME_PROPERTY,
                SPECTROGRAPH_FALLBACK_COLOR,
            ),
            oscilloscope_color: ColorSpec::theme(
                OSCILLOSCOPE_THEME_PROPERTY,
                OSCILLOSCOPE_FALLBACK_COLOR,
            ),
            admission: AdmissionPolicy::default(),
            tuning: SpectrumTuning::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl VisualizerConfig {
    /// Clamp the segment count into range and reject values that would break
    /// the level invariants.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if !self.fall_speed.is_finite() || self.fall_speed < 0.0 {
            return Err(ConfigError::InvalidFallSpeed(self.fall_speed));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if !(self.tuning.magnitude_scale > 0.0) {
            return Err(ConfigError::InvalidMagnitudeScale(
                self.tuning.magnitude_scale,
            ));
        }
        let clamped = self
            .segment_count
            .clamp(MIN_SEGMENT_COUNT, MAX_SEGMENT_COUNT);
        if clamped != self.segment_count {
            log::warn!(
                "[config] segment count {} out of range, using {}",
                self.segment_count,
                clamped
            );
            self.segment_count = clamped;
        }
        Ok(self)
    }

    #[inline]
    fn wide(&self) -> bool {
        self.segment_count > WIDE_ANALYSIS_THRESHOLD
    }

    pub fn fft_size(&self) -> usize {
        if self.wide() {
            FFT_SIZE_WIDE
        } else {
            FFT_SIZE_NARROW
        }
    }

    pub fn bin_count(&self) -> usize {
        self.fft_size() / 2
    }

    pub fn normal_bin_index(&self) -> f32 {
        if self.wide() {
            self.tuning.normal_bin_index_wide
        } else {
            self.tuning.normal_bin_index_narrow
        }
    }
}
