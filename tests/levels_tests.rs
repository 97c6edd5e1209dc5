// Host-side tests for level attack, decay and sampling strategies.

use scope_core::*;

#[test]
fn raise_is_instant_attack_only() {
    let mut levels = SpectrumLevels::new(3);
    levels.raise(0, 0.5);
    levels.raise(0, 0.2);
    assert_eq!(levels.get(0), Some(0.5));
    levels.raise(0, 0.9);
    assert_eq!(levels.get(0), Some(0.9));
}

#[test]
fn raise_clamps_into_unit_range() {
    let mut levels = SpectrumLevels::new(3);
    levels.raise(0, 3.5);
    levels.raise(1, -2.0);
    levels.raise(2, f32::NAN);
    assert_eq!(levels.as_slice(), &[1.0, 0.0, 0.0]);
    // Out of range index is ignored
    levels.raise(9, 1.0);
    assert_eq!(levels.len(), 3);
}

#[test]
fn decay_subtracts_fall_speed_down_to_zero() {
    let mut levels = SpectrumLevels::new(2);
    levels.raise(0, 0.3);
    levels.raise(1, 0.05);
    levels.decay(0.12);
    assert!((levels.get(0).unwrap() - 0.18).abs() < 1e-6);
    assert_eq!(levels.get(1), Some(0.0));
    levels.decay(0.12);
    levels.decay(0.12);
    assert_eq!(levels.get(0), Some(0.0));
    levels.decay(0.12);
    assert_eq!(levels.as_slice(), &[0.0, 0.0]);
}

#[test]
fn synthetic_matches_idle_formula() {
    let tuning = SpectrumTuning::default();
    for &t in &[0.0, 16.0, 1_000.0, 123_456.0] {
        for i in [0usize, 1, 54, 109] {
            let expected = (((i as f64 + t / 20.0) / 15.0).sin() / 4.0 + 0.35) as f32;
            let got = SampleStrategy::Synthetic { clock_ms: t }.candidate(i, 110, &tuning);
            assert!((got - expected).abs() < 1e-5, "i={i} t={t}");
            assert!((0.1 - 1e-6..=0.6 + 1e-6).contains(&got));
        }
    }
}

#[test]
fn real_candidate_maps_segments_onto_bins() {
    let tuning = SpectrumTuning::default();
    let mut bins = vec![0u8; 128];
    bins[55] = 175;
    let strategy = SampleStrategy::Real {
        bins: &bins,
        normal_bin_index: 110.0,
    };
    // Segment 55 of 110 reads bin floor(55/110 * 110) = 55
    let got = strategy.candidate(55, 110, &tuning);
    let expected = 175.0 / 350.0 * (1.0 + 55.0 / 75.0);
    assert!((got - expected).abs() < 1e-6);
    assert_eq!(strategy.candidate(54, 110, &tuning), 0.0);
}

#[test]
fn real_candidate_never_reads_past_the_last_bin() {
    let tuning = SpectrumTuning::default();
    let bins = [10u8, 20, 30, 255];
    let strategy = SampleStrategy::Real {
        bins: &bins,
        normal_bin_index: 220.0,
    };
    let got = strategy.candidate(199, 200, &tuning);
    assert!((got - 255.0 / 350.0 * (1.0 + 199.0 / 75.0)).abs() < 1e-5);
    let empty = SampleStrategy::Real {
        bins: &[],
        normal_bin_index: 110.0,
    };
    assert_eq!(empty.candidate(3, 110, &tuning), 0.0);
}

#[test]
fn levels_stay_in_range_for_any_bins() {
    let tuning = SpectrumTuning::default();
    let mut levels = SpectrumLevels::new(200);
    for fill in [0u8, 1, 64, 128, 200, 255] {
        let bins = vec![fill; 256];
        let strategy = SampleStrategy::Real {
            bins: &bins,
            normal_bin_index: 220.0,
        };
        for i in 0..200 {
            levels.raise(i, strategy.candidate(i, 200, &tuning));
        }
        assert!(levels.as_slice().iter().all(|l| (0.0..=1.0).contains(l)));
        levels.decay(constants::DEFAULT_FALL_SPEED);
    }
}
