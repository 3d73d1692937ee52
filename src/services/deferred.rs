//! Delayed message deletion
//!
//! Deletions are fire-and-forget: a failure is logged and never retried.
//! Pending deletions are dropped when the process shuts down.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::services::actions::ChatActions;

/// Delayed deletions still waiting to run
#[derive(Clone, Default)]
pub struct DeferredDeletes {
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl DeferredDeletes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete `message_id` in `chat_id` once `delay` has passed
    pub fn schedule<A>(&self, actions: Arc<A>, chat_id: i64, message_id: i64, delay: Duration)
    where
        A: ChatActions + ?Sized + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while tasks.try_join_next().is_some() {}

        tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            match actions.delete_message(chat_id, message_id).await {
                Ok(()) => debug!(chat_id = chat_id, message_id = message_id, "Deferred delete done"),
                Err(e) => warn!(
                    chat_id = chat_id,
                    message_id = message_id,
                    error = %e,
                    "Deferred delete failed"
                ),
            }
        });
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Wait for every scheduled deletion to run
    pub async fn drain(&self) {
        let mut tasks = self.take();
        while tasks.join_next().await.is_some() {}
    }

    /// Abort every scheduled deletion that has not run yet
    pub async fn shutdown(&self) {
        let mut tasks = self.take();
        if !tasks.is_empty() {
            debug!(pending = tasks.len(), "Dropping deferred deletes");
        }
        tasks.shutdown().await;
    }

    fn take(&self) -> JoinSet<()> {
        std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
