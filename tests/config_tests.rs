// Host-side tests for per-instance configuration.

use rand::rngs::StdRng;
use rand::SeedableRng;
use scope_core::*;

#[test]
fn defaults() {
    let config = VisualizerConfig::default();
    assert_eq!(config.segment_count, 110);
    assert!(config.show_spectrograph);
    assert!(config.show_oscilloscope);
    assert_eq!(config.fall_speed, 0.12);
    assert_eq!(config.admission.limit_bytes, 12e6);
    assert!(!config.admission.bypass);
    assert_eq!(config.retry.max_attempts, 3);
}

#[test]
fn analysis_window_follows_segment_count() {
    let mut config = VisualizerConfig::default();
    assert_eq!(config.fft_size(), 256);
    assert_eq!(config.bin_count(), 128);
    assert_eq!(config.normal_bin_index(), 110.0);

    config.segment_count = 128;
    assert_eq!(config.fft_size(), 256);

    config.segment_count = 129;
    assert_eq!(config.fft_size(), 512);
    assert_eq!(config.bin_count(), 256);
    assert_eq!(config.normal_bin_index(), 220.0);
}

#[test]
fn segment_count_is_clamped() {
    let low = VisualizerConfig {
        segment_count: 0,
        ..VisualizerConfig::default()
    };
    assert_eq!(low.validated().unwrap().segment_count, 1);
    let high = VisualizerConfig {
        segment_count: 5_000,
        ..VisualizerConfig::default()
    };
    assert_eq!(high.validated().unwrap().segment_count, 200);
}

#[test]
fn invalid_values_are_rejected() {
    let bad_fall = VisualizerConfig {
        fall_speed: -0.1,
        ..VisualizerConfig::default()
    };
    assert_eq!(
        bad_fall.validated(),
        Err(ConfigError::InvalidFallSpeed(-0.1))
    );

    let mut no_attempts = VisualizerConfig::default();
    no_attempts.retry.max_attempts = 0;
    assert_eq!(no_attempts.validated(), Err(ConfigError::NoAttempts));

    let mut bad_scale = VisualizerConfig::default();
    bad_scale.tuning.magnitude_scale = 0.0;
    assert!(matches!(
        bad_scale.validated(),
        Err(ConfigError::InvalidMagnitudeScale(_))
    ));
}

#[test]
fn colors_resolve_from_theme_with_fallback() {
    let config = VisualizerConfig::default();
    let themed = config
        .spectrograph_color
        .resolve(|p| (p == "--brand-experiment").then(|| " #5865F2 ".to_string()));
    assert_eq!(themed, "#5865F2");
    assert_eq!(config.spectrograph_color.resolve(|_| None), "#738ADB");
    assert_eq!(
        config.oscilloscope_color.resolve(|_| Some("  ".into())),
        "#FFFFFF"
    );
    let literal = ColorSpec::Literal("rebeccapurple".into());
    assert_eq!(literal.resolve(|_| Some("#000".into())), "rebeccapurple");
}

#[test]
fn retry_delay_grows_and_caps() {
    let policy = RetryPolicy {
        jitter: 0.0,
        ..RetryPolicy::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let delays: Vec<f64> = (1..=6).map(|n| policy.delay_ms(n, &mut rng)).collect();
    assert_eq!(delays, vec![500.0, 1_000.0, 2_000.0, 4_000.0, 8_000.0, 8_000.0]);
}

#[test]
fn retry_jitter_stays_in_band() {
    let policy = RetryPolicy::default();
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let d = policy.delay_ms(2, &mut rng);
        assert!((800.0..=1_200.0).contains(&d), "{d}");
    }
}
