use crate::error::{Result, StoreError};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Handle to a value write waiting on an asynchronous result.
///
/// Await it to learn whether the write happened, or [`abort`](Self::abort)
/// it to drop the write. Dropping the handle lets the write proceed in the
/// background.
#[must_use = "dropping a PendingWrite detaches it; await it to observe failures"]
pub struct PendingWrite {
    key: String,
    handle: JoinHandle<Result<()>>,
}

impl PendingWrite {
    pub(crate) fn new(key: &str, handle: JoinHandle<Result<()>>) -> Self {
        Self {
            key: key.to_string(),
            handle,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cancel the write. Has no effect if the value was already written.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for PendingWrite {
    type Output = Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.handle).poll(cx);

        match polled {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(err)) if err.is_cancelled() => Poll::Ready(Err(StoreError::Cancelled {
                key: this.key.clone(),
            })),
            Poll::Ready(Err(_)) => Poll::Ready(Err(StoreError::TaskPanicked {
                key: this.key.clone(),
            })),
        }
    }
}

impl std::fmt::Debug for PendingWrite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingWrite")
            .field("key", &self.key)
            .field("finished", &self.is_finished())
            .finish()
    }
}
