use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("fall speed must be finite and non-negative (got {0})")]
    InvalidFallSpeed(f32),
    #[error("retry policy must allow at least one attempt")]
    NoAttempts,
    #[error("magnitude scale must be positive (got {0})")]
    InvalidMagnitudeScale(f32),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcquisitionError {
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("completion dropped before a result was delivered")]
    Dropped,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("could not create source node: {0}")]
    CreateSource(String),
    #[error("could not start source node: {0}")]
    Start(String),
    #[error("source node is {0:?}, expected Idle")]
    NotIdle(crate::source::SourcePhase),
}
