use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A signal the search polls to find out whether it should stop early.
///
/// The search checks it once per visited node.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

/// A signal that never fires. This is the default for every search.
#[derive(Debug, Default, Copy, Clone)]
pub struct NeverCancelled;

impl Cancellation for NeverCancelled {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A cloneable token that can cancel a running search from another thread.
///
/// All clones share the same flag.
#[derive(Debug, Default, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a new token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels every search holding a clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl Cancellation for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
