use scope_core::{ColorSpec, VisualizerConfig};
use wasm_bindgen::prelude::*;

/// Settings snapshot handed to each new visualizer. Defaults match the
/// plugin's built-in configuration.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct VisualizerOptions {
    config: VisualizerConfig,
}

#[wasm_bindgen]
impl VisualizerOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> VisualizerOptions {
        Self::default()
    }

    #[wasm_bindgen(js_name = setSegmentCount)]
    pub fn set_segment_count(&mut self, count: u32) {
        self.config.segment_count = count as usize;
    }

    #[wasm_bindgen(js_name = setShowSpectrograph)]
    pub fn set_show_spectrograph(&mut self, show: bool) {
        self.config.show_spectrograph = show;
    }

    #[wasm_bindgen(js_name = setShowOscilloscope)]
    pub fn set_show_oscilloscope(&mut self, show: bool) {
        self.config.show_oscilloscope = show;
    }

    /// `None` keeps the theme-derived color.
    #[wasm_bindgen(js_name = setSpectrographColor)]
    pub fn set_spectrograph_color(&mut self, color: Option<String>) {
        if let Some(c) = color.filter(|c| !c.trim().is_empty()) {
            self.config.spectrograph_color = ColorSpec::Literal(c);
        }
    }

    /// `None` keeps the theme-derived color.
    #[wasm_bindgen(js_name = setOscilloscopeColor)]
    pub fn set_oscilloscope_color(&mut self, color: Option<String>) {
        if let Some(c) = color.filter(|c| !c.trim().is_empty()) {
            self.config.oscilloscope_color = ColorSpec::Literal(c);
        }
    }

    #[wasm_bindgen(js_name = setFileSizeLimit)]
    pub fn set_file_size_limit(&mut self, limit_bytes: f64) {
        self.config.admission.limit_bytes = limit_bytes;
    }

    #[wasm_bindgen(js_name = setBypassSizeLimit)]
    pub fn set_bypass_size_limit(&mut self, bypass: bool) {
        self.config.admission.bypass = bypass;
    }

    #[wasm_bindgen(js_name = setMaxAttempts)]
    pub fn set_max_attempts(&mut self, attempts: u32) {
        self.config.retry.max_attempts = attempts;
    }

    /// Admission check against these options, for the host's mount hook.
    pub fn admits(&self, file_size: &str) -> bool {
        self.config.admission.admit(file_size).is_admitted()
    }
}

impl VisualizerOptions {
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }
}
