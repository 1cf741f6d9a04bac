use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::error::{GateError, Result};

/// Counts the open session channels of one network connection.
#[derive(Debug)]
pub struct SessionLimiter {
    open: Arc<AtomicU32>,
    max: Option<NonZeroU32>,
}

/// An open session channel. Dropping it frees the slot.
#[derive(Debug)]
pub struct SessionSlot {
    open: Arc<AtomicU32>,
}

impl SessionLimiter {
    /// `None` means no cap.
    pub fn new(max: Option<NonZeroU32>) -> Self {
        SessionLimiter {
            open: Arc::new(AtomicU32::new(0)),
            max,
        }
    }

    /// Claim a slot, or fail once `max` channels are open.
    pub fn try_open(&self) -> Result<SessionSlot> {
        let limit = self.max.map(NonZeroU32::get).unwrap_or(u32::MAX);

        // Check and increment in one step so racing opens cannot overshoot.
        self.open
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |open| {
                (open < limit).then_some(open + 1)
            })
            .map_err(|_| GateError::SessionLimit { max: limit })?;

        Ok(SessionSlot {
            open: self.open.clone(),
        })
    }

    pub fn open_count(&self) -> u32 {
        self.open.load(Ordering::Acquire)
    }

    pub fn max(&self) -> Option<NonZeroU32> {
        self.max
    }
}

impl Drop for SessionSlot {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::AcqRel);
    }
}
