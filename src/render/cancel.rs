use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::foundation::error::{SlideError, SlideResult};

/// Monotonic request counter shared between a caller and its in-flight renders.
///
/// Starting a new request bumps the counter; older requests notice on their next
/// [`RenderTicket::check`] and stop with [`SlideError::Superseded`] instead of publishing stale
/// slides.
#[derive(Clone, Debug, Default)]
pub struct RenderGeneration {
    current: Arc<AtomicU64>,
}

impl RenderGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, invalidating every earlier ticket.
    pub fn begin(&self) -> RenderTicket {
        let started = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        RenderTicket {
            started,
            current: self.current.clone(),
        }
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }
}

/// Handle held by one render request.
#[derive(Clone, Debug)]
pub struct RenderTicket {
    started: u64,
    current: Arc<AtomicU64>,
}

impl RenderTicket {
    pub fn generation(&self) -> u64 {
        self.started
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.started
    }

    pub fn check(&self) -> SlideResult<()> {
        let current = self.current.load(Ordering::Acquire);
        if current != self.started {
            return Err(SlideError::Superseded {
                started: self.started,
                current,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cancel.rs"]
mod tests;
