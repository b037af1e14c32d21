//! One-shot readiness cell gating conversion on module startup.
//!
//! The browser page resolves a single [`Readiness`] once the conversion
//! capability is wired (or once wiring has failed); every convert action
//! awaits it first. The cell is terminal: the first resolution wins and
//! later ones are ignored, so a failed startup keeps failing consistently.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use thiserror::Error;

/// Startup failure surfaced to every action that awaited readiness.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct LoadError(String);

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Clone, Default)]
pub struct Readiness {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Default)]
struct Inner {
    outcome: Option<Result<(), LoadError>>,
    wakers: Vec<Waker>,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the cell resolved. Only the first call has any effect.
    pub fn resolve(&self, outcome: Result<(), LoadError>) {
        let mut inner = self.inner.borrow_mut();
        if inner.outcome.is_some() {
            return;
        }
        inner.outcome = Some(outcome);
        for waker in inner.wakers.drain(..) {
            waker.wake();
        }
    }

    /// Waits until the cell is resolved and yields the terminal outcome.
    pub fn ready(&self) -> Ready {
        Ready {
            inner: Rc::clone(&self.inner),
        }
    }
}

pub struct Ready {
    inner: Rc<RefCell<Inner>>,
}

impl Future for Ready {
    type Output = Result<(), LoadError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.inner.borrow_mut();
        if let Some(outcome) = &inner.outcome {
            return Poll::Ready(outcome.clone());
        }
        if !inner.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            inner.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use std::pin::pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::task::Wake;

    use super::*;

    #[derive(Default)]
    struct Flag(AtomicBool);

    impl Wake for Flag {
        fn wake(self: Arc<Self>) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn pending_until_resolved() {
        let readiness = Readiness::new();
        let mut cx = Context::from_waker(Waker::noop());
        let mut future = pin!(readiness.ready());
        assert!(future.as_mut().poll(&mut cx).is_pending());

        readiness.resolve(Ok(()));
        assert_eq!(future.as_mut().poll(&mut cx), Poll::Ready(Ok(())));
    }

    #[test]
    fn resolution_wakes_waiters() {
        let readiness = Readiness::new();
        let flag = Arc::new(Flag::default());
        let waker = Waker::from(Arc::clone(&flag));
        let mut cx = Context::from_waker(&waker);
        let mut future = pin!(readiness.ready());
        assert!(future.as_mut().poll(&mut cx).is_pending());

        readiness.resolve(Ok(()));
        assert!(flag.0.load(Ordering::SeqCst));
    }

    #[test]
    fn failure_is_terminal() {
        let readiness = Readiness::new();
        readiness.resolve(Err(LoadError::new("module did not load")));
        // A later success must not overwrite the failed state.
        readiness.resolve(Ok(()));

        let mut cx = Context::from_waker(Waker::noop());
        let mut future = pin!(readiness.ready());
        assert_eq!(
            future.as_mut().poll(&mut cx),
            Poll::Ready(Err(LoadError::new("module did not load")))
        );
    }

    #[test]
    fn already_resolved_is_ready_immediately() {
        let readiness = Readiness::new();
        readiness.resolve(Ok(()));

        let mut cx = Context::from_waker(Waker::noop());
        let mut future = pin!(readiness.ready());
        assert_eq!(future.as_mut().poll(&mut cx), Poll::Ready(Ok(())));
    }
}
