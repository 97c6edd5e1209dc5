//! Out-of-band fetch + decode bookkeeping.
//!
//! The backend performs the fetch asynchronously and writes its result into a
//! [`Completion`]. The frame loop polls on a later frame. Callbacks are
//! serialized by the host runtime, so the slot is a plain `Rc<RefCell<_>>`.

use crate::config::RetryPolicy;
use crate::error::AcquisitionError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;

type Slot<B> = Rc<RefCell<Option<Result<B, AcquisitionError>>>>;

pub struct Completion<B> {
    slot: Slot<B>,
    delivered: bool,
}

impl<B> Completion<B> {
    fn new(slot: Slot<B>) -> Self {
        Self {
            slot,
            delivered: false,
        }
    }

    pub fn complete(mut self, result: Result<B, AcquisitionError>) {
        *self.slot.borrow_mut() = Some(result);
        self.delivered = true;
    }

    pub fn succeed(self, buffer: B) {
        self.complete(Ok(buffer));
    }

    pub fn fail(self, err: AcquisitionError) {
        self.complete(Err(err));
    }
}

impl<B> Drop for Completion<B> {
    fn drop(&mut self) {
        if !self.delivered {
            if let Ok(mut slot) = self.slot.try_borrow_mut() {
                if slot.is_none() {
                    *slot = Some(Err(AcquisitionError::Dropped));
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AcquisitionPhase {
    NotStarted,
    InFlight,
    Backoff { retry_at_ms: f64 },
    Ready,
    /// Gave up; the instance stays on the idle animation.
    Failed,
}

pub struct Acquisition<B> {
    phase: AcquisitionPhase,
    url: String,
    slot: Slot<B>,
    attempts: u32,
    policy: RetryPolicy,
    rng: StdRng,
}

impl<B> Acquisition<B> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_rng(policy, StdRng::from_entropy())
    }

    pub fn with_seed(policy: RetryPolicy, seed: u64) -> Self {
        Self::with_rng(policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(policy: RetryPolicy, rng: StdRng) -> Self {
        Self {
            phase: AcquisitionPhase::NotStarted,
            url: String::new(),
            slot: Rc::new(RefCell::new(None)),
            attempts: 0,
            policy,
            rng,
        }
    }

    #[inline]
    pub fn phase(&self) -> AcquisitionPhase {
        self.phase
    }

    #[inline]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Empty until [`begin`](Self::begin) is called.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.phase != AcquisitionPhase::NotStarted
    }

    /// Latch: yields a completion only the first time it is called.
    /// Retries reuse `url`.
    pub fn begin(&mut self, url: &str) -> Option<Completion<B>> {
        if self.phase != AcquisitionPhase::NotStarted {
            return None;
        }
        self.url = url.to_string();
        Some(self.launch())
    }

    pub fn retry_due(&mut self, now_ms: f64) -> Option<Completion<B>> {
        match self.phase {
            AcquisitionPhase::Backoff { retry_at_ms } if now_ms >= retry_at_ms => {
                log::info!(
                    "[acquire] retrying {} (attempt {})",
                    self.url,
                    self.attempts + 1
                );
                Some(self.launch())
            }
            _ => None,
        }
    }

    fn launch(&mut self) -> Completion<B> {
        self.attempts += 1;
        self.phase = AcquisitionPhase::InFlight;
        self.slot = Rc::new(RefCell::new(None));
        Completion::new(self.slot.clone())
    }

    /// Take a finished result. A decoded buffer is handed out exactly once.
    pub fn poll(&mut self, now_ms: f64) -> Option<B> {
        if self.phase != AcquisitionPhase::InFlight {
            return None;
        }
        let result = self.slot.try_borrow_mut().ok()?.take()?;
        match result {
            Ok(buffer) => {
                log::info!(
                    "[acquire] {} ready after {} attempt(s)",
                    self.url,
                    self.attempts
                );
                self.phase = AcquisitionPhase::Ready;
                Some(buffer)
            }
            Err(err) => {
                if self.attempts < self.policy.max_attempts {
                    let delay = self.policy.delay_ms(self.attempts, &mut self.rng);
                    log::warn!(
                        "[acquire] attempt {} for {} failed: {}; retrying in {:.0}ms",
                        self.attempts,
                        self.url,
                        err,
                        delay
                    );
                    self.phase = AcquisitionPhase::Backoff {
                        retry_at_ms: now_ms + delay,
                    };
                } else {
                    log::error!(
                        "[acquire] giving up on {} after {} attempt(s): {}",
                        self.url,
                        self.attempts,
                        err
                    );
                    self.phase = AcquisitionPhase::Failed;
                }
                None
            }
        }
    }
    /// The decoded buffer could not be wired into the graph. Terminal: a
    /// refetch would yield the same buffer.
    pub fn abandon(&mut self, reason: &dyn std::fmt::Display) {
        if self.phase == AcquisitionPhase::Failed {
            return;
        }
        log::error!("[acquire] dropping audio from {}: {}", self.url, reason);
        self.phase = AcquisitionPhase::Failed;
    }
}
