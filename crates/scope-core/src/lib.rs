//! Playback-synchronized spectrogram and oscilloscope engine.
//!
//! Platform-free: the web and native front-ends supply an [`AudioBackend`],
//! a [`Surface`] and a [`PlaybackObserver`].

pub mod acquisition;
pub mod admission;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod graph;
pub mod instance;
pub mod levels;
pub mod render;
pub mod source;

pub use acquisition::*;
pub use admission::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use graph::*;
pub use instance::*;
pub use levels::*;
pub use render::*;
pub use source::*;
