use crate::config::SpectrumTuning;

#[derive(Clone, Debug)]
pub struct SpectrumLevels {
    values: Vec<f32>,
}

impl SpectrumLevels {
    pub fn new(segment_count: usize) -> Self {
        Self {
            values: vec![0.0; segment_count],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<f32> {
        self.values.get(i).copied()
    }

    /// Instant attack: jump up to the candidate, never down.
    pub fn raise(&mut self, i: usize, candidate: f32) {
        if let Some(level) = self.values.get_mut(i) {
            let c = if candidate.is_nan() {
                0.0
            } else {
                candidate.clamp(0.0, 1.0)
            };
            if *level < c {
                *level = c;
            }
        }
    }

    pub fn decay_one(&mut self, i: usize, fall_speed: f32) {
        if let Some(level) = self.values.get_mut(i) {
            if *level != 0.0 {
                *level = (*level - fall_speed).max(0.0);
            }
        }
    }

    pub fn decay(&mut self, fall_speed: f32) {
        for i in 0..self.values.len() {
            self.decay_one(i, fall_speed);
        }
    }
}

/// Where this frame's bar candidates come from, chosen once per frame.
#[derive(Clone, Copy, Debug)]
pub enum SampleStrategy<'a> {
    Real { bins: &'a [u8], normal_bin_index: f32 },
    Synthetic { clock_ms: f64 },
}

impl<'a> SampleStrategy<'a> {
    pub fn candidate(&self, i: usize, segment_count: usize, tuning: &SpectrumTuning) -> f32 {
        let fi = i as f32;
        match *self {
            SampleStrategy::Real {
                bins,
                normal_bin_index,
            } => {
                if bins.is_empty() {
                    return 0.0;
                }
                let idx = ((fi / segment_count as f32) * normal_bin_index).floor() as usize;
                let magnitude = f32::from(bins[idx.min(bins.len() - 1)]);
                magnitude / tuning.magnitude_scale * (1.0 + fi / tuning.emphasis_divisor)
            }
            SampleStrategy::Synthetic { clock_ms } => {
                synthetic_level(i, clock_ms, tuning)
            }
        }
    }
}

/// `sin((i + t/20) / 15) / 4 + 0.35` with the default tuning.
pub fn synthetic_level(i: usize, clock_ms: f64, tuning: &SpectrumTuning) -> f32 {
    let phase = (i as f64 + clock_ms / f64::from(tuning.idle_time_divisor))
        / f64::from(tuning.idle_phase_divisor);
    (phase.sin() as f32) * tuning.idle_amplitude + tuning.idle_offset
}
