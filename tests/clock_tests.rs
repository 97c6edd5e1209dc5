// Host-side tests for the playback clock.

use scope_core::{ClockStep, PlaybackClock};

#[test]
fn first_tick_has_zero_delta() {
    let mut clock = PlaybackClock::new();
    assert_eq!(clock.tick(12_345.0), 0.0);
    assert_eq!(clock.tick(12_361.0), 16.0);
}

#[test]
fn backwards_timestamps_do_not_rewind() {
    let mut clock = PlaybackClock::new();
    clock.tick(100.0);
    assert_eq!(clock.tick(90.0), 0.0);
    assert_eq!(clock.tick(106.0), 16.0);
}

#[test]
fn advances_only_while_playing() {
    let mut clock = PlaybackClock::new();
    assert_eq!(clock.reconcile(true, 0, 400.0), ClockStep::Advanced);
    assert_eq!(clock.millis(), 400.0);
    assert_eq!(clock.reconcile(false, 0, 400.0), ClockStep::Advanced);
    assert_eq!(clock.millis(), 400.0);
}

#[test]
fn sub_second_drift_is_tolerated() {
    let mut clock = PlaybackClock::new();
    clock.reconcile(true, 0, 999.0);
    assert_eq!(clock.millis(), 999.0);
    // The player has already ticked over to 1s; we are still in second 0
    let mut ahead = PlaybackClock::new();
    assert_eq!(
        ahead.reconcile(true, 1, 999.0),
        ClockStep::Resynced { playing: true }
    );
    assert_eq!(ahead.millis(), 1000.0);
}

#[test]
fn resync_snaps_to_whole_seconds() {
    for position in [0u32, 1, 7, 59, 3_600] {
        let mut clock = PlaybackClock::new();
        clock.reconcile(true, 0, 250.0);
        let step = clock.reconcile(true, position, 16.0);
        if position == 0 {
            assert_eq!(step, ClockStep::Advanced);
            assert_eq!(clock.millis(), 266.0);
        } else {
            assert_eq!(step, ClockStep::Resynced { playing: true });
            assert_eq!(clock.millis(), f64::from(position) * 1000.0);
            assert_eq!(clock.seconds(), f64::from(position));
        }
    }
}

#[test]
fn paused_seek_resyncs_without_playing_flag() {
    let mut clock = PlaybackClock::new();
    assert_eq!(
        clock.reconcile(false, 12, 16.0),
        ClockStep::Resynced { playing: false }
    );
    assert_eq!(clock.millis(), 12_000.0);
}

#[test]
fn rolling_into_next_second_while_player_lags_resyncs_back() {
    let mut clock = PlaybackClock::new();
    clock.reconcile(true, 4, 0.0);
    clock.reconcile(true, 4, 990.0);
    assert_eq!(clock.millis(), 4_990.0);
    assert_eq!(
        clock.reconcile(true, 4, 16.0),
        ClockStep::Resynced { playing: true }
    );
    assert_eq!(clock.millis(), 4_000.0);
}
