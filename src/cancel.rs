//! Cooperative cancellation
//!
//! A `CancelToken` is a shared stop flag, in the same spirit as the
//! `Arc<AtomicBool>` stop flags handed to worker threads. Tokens form a tree:
//! a child observes cancellation of any ancestor, and may carry its own
//! deadline. Cancelling a child never affects its parent or siblings.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<CancelToken>,
}

/// Shared, cloneable cancellation flag
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Create a root token with no deadline
    pub fn new() -> Self {
        Self::build(None, None)
    }

    fn build(deadline: Option<Instant>, parent: Option<CancelToken>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline,
                parent,
            }),
        }
    }

    /// Create a token that is cancelled whenever `self` is
    pub fn child(&self) -> Self {
        Self::build(None, Some(self.clone()))
    }

    /// Create a child token that also expires at `deadline`
    pub fn child_with_deadline(&self, deadline: Instant) -> Self {
        Self::build(Some(deadline), Some(self.clone()))
    }

    /// Create a child token that expires `timeout` from now
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        self.child_with_deadline(Instant::now() + timeout)
    }

    /// Request cancellation of this token and all of its descendants
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    /// True if this token or an ancestor was cancelled, or any deadline on
    /// the chain has passed
    pub fn is_cancelled(&self) -> bool {
        let mut token = self;
        loop {
            if token.inner.cancelled.load(Ordering::SeqCst) || token.own_deadline_passed() {
                return true;
            }
            match &token.inner.parent {
                Some(parent) => token = parent,
                None => return false,
            }
        }
    }

    /// True if a deadline somewhere on the chain has passed
    pub fn deadline_passed(&self) -> bool {
        let mut token = self;
        loop {
            if token.own_deadline_passed() {
                return true;
            }
            match &token.inner.parent {
                Some(parent) => token = parent,
                None => return false,
            }
        }
    }

    /// Earliest deadline on the chain, if any
    pub fn deadline(&self) -> Option<Instant> {
        let own = self.inner.deadline;
        let inherited = self.inner.parent.as_ref().and_then(|p| p.deadline());
        match (own, inherited) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn own_deadline_passed(&self) -> bool {
        self.inner.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_propagates_to_children() {
        let root = CancelToken::new();
        let child = root.child();
        let grandchild = child.child();

        assert!(!grandchild.is_cancelled());
        root.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_child_cancel_does_not_reach_parent() {
        let root = CancelToken::new();
        let a = root.child();
        let b = root.child();

        a.cancel();
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
        assert!(!root.is_cancelled());
    }

    #[test]
    fn test_deadline_expiry() {
        let root = CancelToken::new();
        let expired = root.child_with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(expired.is_cancelled());
        assert!(expired.deadline_passed());
        assert!(!root.is_cancelled());

        let pending = root.child_with_timeout(Duration::from_secs(3600));
        assert!(!pending.is_cancelled());
        assert!(!pending.deadline_passed());
    }

    #[test]
    fn test_earliest_deadline_wins() {
        let now = Instant::now();
        let outer = CancelToken::new().child_with_deadline(now + Duration::from_secs(10));
        let inner = outer.child_with_deadline(now + Duration::from_secs(60));
        assert_eq!(inner.deadline(), Some(now + Duration::from_secs(10)));
        assert_eq!(CancelToken::new().deadline(), None);
    }
}
