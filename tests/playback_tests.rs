// Host-side tests for the web front-end's playback bridge.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod playback {
    include!("../src/playback.rs");
}

use playback::*;
use scope_core::PlaybackObserver;

#[test]
fn whole_seconds_floors_float_positions() {
    assert_eq!(whole_seconds(0.0), 0);
    assert_eq!(whole_seconds(0.999), 0);
    assert_eq!(whole_seconds(1.0), 1);
    assert_eq!(whole_seconds(61.75), 61);
}

#[test]
fn whole_seconds_rejects_garbage() {
    assert_eq!(whole_seconds(-3.2), 0);
    assert_eq!(whole_seconds(f64::NAN), 0);
    assert_eq!(whole_seconds(f64::INFINITY), 0);
    assert_eq!(whole_seconds(1e12), u32::MAX);
}

#[test]
fn shared_playback_is_seen_by_every_clone() {
    let host = SharedPlayback::new("https://cdn.example/a.ogg");
    let engine_view = host.clone();
    assert!(!engine_view.is_playing());
    assert_eq!(engine_view.position_secs(), 0);

    host.set(true, 12.6);
    assert!(engine_view.is_playing());
    assert_eq!(engine_view.position_secs(), 12);
    assert_eq!(
        engine_view.snapshot(),
        PlaybackSnapshot {
            playing: true,
            position_secs: 12
        }
    );
    assert_eq!(engine_view.source_url(), "https://cdn.example/a.ogg");

    host.set(false, 12.9);
    assert!(!engine_view.is_playing());
}
