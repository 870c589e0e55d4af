// Write-once result handle for fire-and-forget operations

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::warn;

/// A value that a background task may write once.
///
/// Awaiting it yields the value if the task wrote one. If the task finished
/// without writing, the future stays pending for good: a failure looks the
/// same as an operation that has not completed yet. Use [`Deferred::settle`]
/// and [`Deferred::try_take`] to observe the outcome without waiting forever.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct Deferred<T> {
    rx: Option<oneshot::Receiver<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T> Deferred<T> {
    pub(crate) fn new(rx: oneshot::Receiver<T>, worker: Option<JoinHandle<()>>) -> Self {
        Self {
            rx: Some(rx),
            worker,
        }
    }

    /// Wait until the producing task has finished, whatever its outcome.
    pub async fn settle(&mut self) {
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                warn!("Deferred producer ended abnormally: {}", e);
            }
        }
    }

    /// Take the value if it has been written. Does not wait.
    pub fn try_take(&mut self) -> Option<T> {
        match self.rx.as_mut()?.try_recv() {
            Ok(value) => {
                self.rx = None;
                Some(value)
            }
            // a closed receiver must not be polled again
            Err(TryRecvError::Closed) => {
                self.rx = None;
                None
            }
            Err(TryRecvError::Empty) => None,
        }
    }
}

impl<T> Future for Deferred<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Pending;
        };

        match Pin::new(rx).poll(cx) {
            Poll::Ready(Ok(value)) => {
                self.rx = None;
                Poll::Ready(value)
            }
            // producer dropped the sender without a value; never resolves
            Poll::Ready(Err(_)) => {
                self.rx = None;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    #[test]
    fn test_resolves_once_written() {
        let (tx, rx) = oneshot::channel();
        let mut deferred = task::spawn(Deferred::new(rx, None));

        assert_pending!(deferred.poll());
        tx.send(42u32).unwrap();
        assert!(deferred.is_woken());
        assert_ready_eq!(deferred.poll(), 42);
    }

    #[test]
    fn test_abandoned_stays_pending() {
        let (tx, rx) = oneshot::channel::<u32>();
        let mut deferred = task::spawn(Deferred::new(rx, None));

        drop(tx);
        assert_pending!(deferred.poll());
        assert_pending!(deferred.poll());
    }

    #[test]
    fn test_try_take() {
        let (tx, rx) = oneshot::channel();
        let mut deferred = Deferred::new(rx, None);

        assert_eq!(deferred.try_take(), None);
        tx.send("layer").unwrap();
        assert_eq!(deferred.try_take(), Some("layer"));
        assert_eq!(deferred.try_take(), None);
    }

    #[tokio::test]
    async fn test_settle_waits_for_worker() {
        let (tx, rx) = oneshot::channel::<u32>();
        let worker = tokio::spawn(async move {
            tokio::task::yield_now().await;
            drop(tx);
        });
        let mut deferred = Deferred::new(rx, Some(worker));

        deferred.settle().await;
        assert!(deferred.worker.is_none());
        assert_eq!(deferred.try_take(), None);
    }

    #[test]
    fn test_abandoned_stays_pending_after_try_take() {
        let (tx, rx) = oneshot::channel::<u32>();
        let mut deferred = Deferred::new(rx, None);

        drop(tx);
        assert_eq!(deferred.try_take(), None);
        assert_eq!(deferred.try_take(), None);

        let mut deferred = task::spawn(deferred);
        assert_pending!(deferred.poll());
        assert_pending!(deferred.poll());
    }

    #[tokio::test]
    async fn test_awaiting_abandoned_times_out() {
        let (tx, rx) = oneshot::channel::<u32>();
        let mut deferred = Deferred::new(rx, None);

        drop(tx);
        assert_eq!(deferred.try_take(), None);
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(50), &mut deferred).await;
        assert!(waited.is_err());
    }
}
