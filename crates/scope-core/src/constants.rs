// Tuning constants shared by the web and native front-ends.

// Spectrogram layout
pub const DEFAULT_SEGMENT_COUNT: usize = 110;
pub const MIN_SEGMENT_COUNT: usize = 1;
pub const MAX_SEGMENT_COUNT: usize = 200;
pub const BAR_OVERLAP_PX: f32 = 0.5; // hides seams between adjacent bars

// Analysis window; segment counts above the threshold get the wide window
pub const WIDE_ANALYSIS_THRESHOLD: usize = 128;
pub const FFT_SIZE_NARROW: usize = 256;
pub const FFT_SIZE_WIDE: usize = 512;

// Bin remap and magnitude scaling (visual tuning, not derived)
pub const NORMAL_BIN_INDEX_NARROW: f32 = 110.0;
pub const NORMAL_BIN_INDEX_WIDE: f32 = 220.0;
pub const MAGNITUDE_SCALE: f32 = 350.0;
pub const EMPHASIS_DIVISOR: f32 = 75.0;

// Idle sinusoid shown before decoded audio is available
pub const IDLE_TIME_DIVISOR: f32 = 20.0;
pub const IDLE_PHASE_DIVISOR: f32 = 15.0;
pub const IDLE_AMPLITUDE: f32 = 0.25;
pub const IDLE_OFFSET: f32 = 0.35;

// Level decay per frame
pub const DEFAULT_FALL_SPEED: f32 = 0.12;

// Oscilloscope
pub const OSCILLOSCOPE_STRIDE: usize = 2; // plot every other time-domain sample
pub const SAMPLE_RANGE: f32 = 256.0; // byte samples map [0, 256) onto the canvas height

// Admission
pub const DEFAULT_FILE_SIZE_LIMIT_BYTES: f64 = 12e6;

// Acquisition retry
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: f64 = 500.0;
pub const DEFAULT_RETRY_MAX_DELAY_MS: f64 = 8_000.0;
pub const DEFAULT_RETRY_JITTER: f64 = 0.2; // +/- fraction of the computed delay

// Theme custom properties and their fallbacks
pub const SPECTROGRAPH_THEME_PROPERTY: &str = "--brand-experiment";
pub const SPECTROGRAPH_FALLBACK_COLOR: &str = "#738ADB";
pub const OSCILLOSCOPE_THEME_PROPERTY: &str = "--text-normal";
pub const OSCILLOSCOPE_FALLBACK_COLOR: &str = "#FFFFFF";
