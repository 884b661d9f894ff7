// Download executor bounding the number of concurrent transfers

use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};

use crate::download::task::DownloadTask;
use crate::error::{ProvisionError, Result};

/// Runs download tasks with at most `max_concurrency` transfers in flight.
///
/// The executor is scoped to one download group: `join` drains every
/// submitted task, and dropping the executor aborts whatever is still
/// running, so no transfer outlives the group on any exit path.
pub struct DownloadExecutor {
    permits: Arc<Semaphore>,
    tasks: JoinSet<Result<()>>,
    urls: HashMap<Id, String>,
}

impl DownloadExecutor {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            tasks: JoinSet::new(),
            urls: HashMap::new(),
        }
    }

    /// Queue a task; it starts as soon as a permit is free
    pub fn submit(&mut self, task: DownloadTask) {
        let permits = Arc::clone(&self.permits);
        let url = task.url().to_string();

        let handle = self.tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.map_err(|e| {
                ProvisionError::download(task.url(), format!("executor shut down: {}", e))
            })?;
            task.run().await
        });

        self.urls.insert(handle.id(), url);
    }

    /// Number of submitted tasks that have not been joined yet
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for all submitted tasks.
    ///
    /// On the first failure the remaining transfers are aborted and drained
    /// before the error is returned.
    pub async fn join(mut self) -> Result<()> {
        let mut first_error = None;

        while let Some(joined) = self.tasks.join_next_with_id().await {
            let outcome = match joined {
                Ok((_, result)) => result,
                Err(e) if e.is_cancelled() => continue,
                Err(e) => {
                    let url = self.urls.get(&e.id()).cloned().unwrap_or_default();
                    Err(ProvisionError::download(url, format!("download task failed: {}", e)))
                }
            };

            if let Err(e) = outcome
                && first_error.is_none()
            {
                warn!("Download failed, cancelling {} pending transfer(s)", self.tasks.len());
                self.tasks.abort_all();
                first_error = Some(e);
            }
        }

        debug!("Download group finished");
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for DownloadExecutor {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            debug!("Aborting {} unfinished download(s)", self.tasks.len());
            self.tasks.abort_all();
        }
    }
}
