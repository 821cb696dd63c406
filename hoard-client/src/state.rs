use std::sync::Arc;

use crossbeam::atomic::AtomicCell;

use crate::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadingState {
    #[default]
    Loading,
    Done,
    Error,
}

/// Tracks whether the owner of a store is still around.
///
/// Once ended, responses that arrive are ignored instead of written to
/// state. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct Lifetime {
    ended: Arc<AtomicCell<bool>>,
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn end(&self) {
        self.ended.store(true);
    }

    pub fn is_ended(&self) -> bool {
        self.ended.load()
    }

    pub fn ensure_alive(&self) -> StoreResult<()> {
        if self.is_ended() {
            Err(StoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}
