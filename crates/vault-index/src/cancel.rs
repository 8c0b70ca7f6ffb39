//! Cancellation token for long-running queries (§5).
//!
//! A simple `Arc<AtomicBool>`-backed flag, checked by value rather than
//! wired to any particular async runtime's cancellation primitive, since
//! this engine is runtime-agnostic (§5 models suspension points as
//! synchronous, pull-driven control returns).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cooperatively-checked cancellation flag. Cloning shares the same
/// underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Trips the flag. Visible to every clone.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`CancellationToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn cancel_is_visible_across_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
