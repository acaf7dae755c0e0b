//! Cancellation and deadlines for store operations.
//!
//! A [`Context`] is passed to every store operation. Stores call
//! [`Context::check`] before doing work. An operation that is already blocked
//! in a system call when the context is cancelled may still complete normally.
//!
//! ```rust
//! use pathkv_core::Context;
//!
//! let (ctx, cancel) = Context::background().with_cancel();
//! assert!(ctx.check().is_ok());
//!
//! cancel.cancel();
//! assert!(ctx.check().unwrap_err().is_cancellation());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{Error, Result};

struct Node {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<Arc<Node>>,
}

impl Node {
    fn ancestry(self: &Arc<Self>) -> impl Iterator<Item = &Node> {
        std::iter::successors(Some(self.as_ref()), |&node| node.parent.as_deref())
    }
}

/// Carries cancellation and a deadline across store calls.
///
/// Cloning is cheap; clones share cancellation state. Derived contexts see
/// their parent's cancellation and the earliest deadline along the chain.
#[derive(Clone, Default)]
pub struct Context {
    node: Option<Arc<Node>>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    fn derive(&self, deadline: Option<Instant>) -> Context {
        Context {
            node: Some(Arc::new(Node {
                cancelled: AtomicBool::new(false),
                deadline,
                parent: self.node.clone(),
            })),
        }
    }

    /// Derive a cancellable context.
    ///
    /// Cancelling the returned handle cancels the new context and everything
    /// derived from it, but not `self`.
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        let ctx = self.derive(None);
        let handle = CancelHandle {
            node: ctx.node.clone(),
        };
        (ctx, handle)
    }

    /// Derive a context that expires at `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Context {
        self.derive(Some(deadline))
    }

    /// Derive a context that expires after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Context {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The earliest deadline of this context and its ancestors.
    pub fn deadline(&self) -> Option<Instant> {
        self.node
            .as_ref()?
            .ancestry()
            .filter_map(|node| node.deadline)
            .min()
    }

    /// Time left until the deadline, saturating at zero.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns the reason this context is done, if it is.
    pub fn err(&self) -> Option<Error> {
        let node = self.node.as_ref()?;
        if node
            .ancestry()
            .any(|node| node.cancelled.load(Ordering::Acquire))
        {
            return Some(Error::Cancelled);
        }
        match self.deadline() {
            Some(deadline) if Instant::now() >= deadline => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// `Ok(())` while the context is live, otherwise the reason it is done.
    pub fn check(&self) -> Result<()> {
        match self.err() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.deadline())
            .field("done", &self.is_done())
            .finish()
    }
}

/// Cancels the context returned alongside it by [`Context::with_cancel`].
#[derive(Clone)]
pub struct CancelHandle {
    node: Option<Arc<Node>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        if let Some(node) = &self.node {
            node.cancelled.store(true, Ordering::Release);
        }
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_never_done() {
        let ctx = Context::background();
        assert!(ctx.check().is_ok());
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn cancel_propagates_to_children_only() {
        let (parent, cancel_parent) = Context::background().with_cancel();
        let (child, cancel_child) = parent.with_cancel();

        cancel_child.cancel();
        assert!(matches!(child.check(), Err(Error::Cancelled)));
        assert!(parent.check().is_ok());

        let (other_child, _) = parent.with_cancel();
        cancel_parent.cancel();
        assert!(matches!(other_child.check(), Err(Error::Cancelled)));
        assert!(matches!(parent.check(), Err(Error::Cancelled)));
    }

    #[test]
    fn clones_share_cancellation() {
        let (ctx, cancel) = Context::background().with_cancel();
        let clone = ctx.clone();
        cancel.cancel();
        assert!(clone.is_done());
    }

    #[test]
    fn expired_deadline() {
        let ctx = Context::background().with_timeout(Duration::ZERO);
        assert!(matches!(ctx.check(), Err(Error::DeadlineExceeded)));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn earliest_deadline_wins() {
        let now = Instant::now();
        let near = now + Duration::from_secs(5);
        let far = now + Duration::from_secs(60);

        let ctx = Context::background().with_deadline(near).with_deadline(far);
        assert_eq!(ctx.deadline(), Some(near));
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn cancellation_beats_deadline() {
        let (ctx, cancel) = Context::background()
            .with_timeout(Duration::ZERO)
            .with_cancel();
        cancel.cancel();
        assert!(matches!(ctx.check(), Err(Error::Cancelled)));
    }
}
