//! Runs blocking repository calls off the async executor.

use crate::db::repository::Repository;
use crate::libs::error::{StoreError, StoreResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct Worker {
    repo: Arc<dyn Repository>,
}

impl Worker {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Worker { repo }
    }

    /// Runs `f` on the blocking thread pool. A panic or cancellation of the
    /// blocking task becomes [`StoreError::Worker`].
    pub async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Repository) -> StoreResult<T> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || f(repo.as_ref()))
            .await
            .map_err(|e| {
                tracing::error!("worker join error: {}", e);
                StoreError::Worker(e.to_string())
            })?
    }
}
