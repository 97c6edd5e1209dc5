//! Single-use playback source.
//!
//! A source node can be started once. After it is stopped it is exhausted and
//! must be replaced by a fresh node bound to the same decoded buffer.

use crate::error::GraphError;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourcePhase {
    Idle,
    Started,
    Exhausted,
}

pub trait SourceNode {
    fn start(&mut self, offset_secs: f64) -> Result<(), GraphError>;
    fn stop(&mut self);
}

pub struct OneShotSource<N, B> {
    node: N,
    buffer: Rc<B>,
    phase: SourcePhase,
    generation: u64,
}

impl<N: SourceNode, B> OneShotSource<N, B> {
    pub fn new(node: N, buffer: Rc<B>, generation: u64) -> Self {
        Self {
            node,
            buffer,
            phase: SourcePhase::Idle,
            generation,
        }
    }

    #[inline]
    pub fn phase(&self) -> SourcePhase {
        self.phase
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn buffer(&self) -> &Rc<B> {
        &self.buffer
    }

    #[inline]
    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn start(&mut self, offset_secs: f64) -> Result<(), GraphError> {
        if self.phase != SourcePhase::Idle {
            return Err(GraphError::NotIdle(self.phase));
        }
        self.node.start(offset_secs.max(0.0))?;
        self.phase = SourcePhase::Started;
        Ok(())
    }

    /// Stop a running node. Returns `false` if it was never started.
    pub fn stop(&mut self) -> bool {
        if self.phase != SourcePhase::Started {
            return false;
        }
        self.node.stop();
        self.phase = SourcePhase::Exhausted;
        true
    }
}
