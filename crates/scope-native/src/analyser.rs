//! Software analyser producing the same byte output as a Web Audio
//! `AnalyserNode`: Blackman window, FFT, temporal smoothing, dB mapping.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

pub const SMOOTHING_TIME_CONSTANT: f32 = 0.8;
pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;
const BLACKMAN_ALPHA: f32 = 0.16;

pub struct SoftwareAnalyser {
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl SoftwareAnalyser {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let n = fft_size as f32;
        let a0 = (1.0 - BLACKMAN_ALPHA) / 2.0;
        let a1 = 0.5;
        let a2 = BLACKMAN_ALPHA / 2.0;
        let window = (0..fft_size)
            .map(|i| {
                let x = i as f32 / n;
                a0 - a1 * (2.0 * std::f32::consts::PI * x).cos()
                    + a2 * (4.0 * std::f32::consts::PI * x).cos()
            })
            .collect();
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        Self {
            fft_size,
            fft,
            window,
            buf: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
            smoothed: vec![0.0; fft_size / 2],
        }
    }

    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// `input` holds the most recent `fft_size` samples, zero-padded at the
    /// front when fewer are available. Updates smoothing state.
    pub fn frequency_bytes(&mut self, input: &[f32], out: &mut [u8]) {
        for (i, slot) in self.buf.iter_mut().enumerate() {
            let s = input.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process_with_scratch(&mut self.buf, &mut self.scratch);

        let scale = 1.0 / self.fft_size as f32;
        let range = MAX_DECIBELS - MIN_DECIBELS;
        for (k, smoothed) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.buf[k].norm() * scale;
            *smoothed = SMOOTHING_TIME_CONSTANT * *smoothed
                + (1.0 - SMOOTHING_TIME_CONSTANT) * magnitude;
            if let Some(byte) = out.get_mut(k) {
                *byte = if *smoothed <= 0.0 {
                    0
                } else {
                    let db = 20.0 * smoothed.log10();
                    (255.0 / range * (db - MIN_DECIBELS)).clamp(0.0, 255.0) as u8
                };
            }
        }
    }

    /// Waveform bytes: `128 * (1 + x)`, clamped.
    pub fn time_domain_bytes(input: &[f32], out: &mut [u8]) {
        for (i, byte) in out.iter_mut().enumerate() {
            let s = input.get(i).copied().unwrap_or(0.0);
            *byte = (128.0 * (1.0 + s)).clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_maps_to_zero_bins() {
        let mut a = SoftwareAnalyser::new(256);
        let input = vec![0.0f32; 256];
        let mut out = vec![7u8; 128];
        a.frequency_bytes(&input, &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn sine_peaks_near_its_bin() {
        let n = 256;
        let bin = 16;
        let input: Vec<f32> = (0..n)
            .map(|i| 0.01 * (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / n as f32).sin())
            .collect();
        let mut a = SoftwareAnalyser::new(n);
        let mut out = vec![0u8; n / 2];
        // let smoothing settle
        for _ in 0..30 {
            a.frequency_bytes(&input, &mut out);
        }
        let peak = out
            .iter()
            .enumerate()
            .max_by_key(|&(_, b)| *b)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, bin);
        assert!(out[bin] > 150, "peak level {}", out[bin]);
        assert!(out[bin + 4] < 50, "leakage {}", out[bin + 4]);
    }

    #[test]
    fn time_domain_centers_silence_on_128() {
        let mut out = vec![0u8; 4];
        SoftwareAnalyser::time_domain_bytes(&[0.0, 1.0, -1.0, 2.0], &mut out);
        assert_eq!(out, vec![128, 255, 0, 255]);
    }
}
