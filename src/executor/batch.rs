//! Keyed fan-out/fan-in task runner with a fixed concurrency ceiling
//!
//! Tasks are spawned on the tokio runtime as soon as they are submitted and
//! gated by a semaphore, so at most `concurrency` task bodies run at once.
//! `Batch::wait` is the join barrier: it returns only after every submitted
//! task has finished, successfully or not.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// Default number of tasks allowed to run at once
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Errors raised while submitting tasks
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    /// The same key was submitted twice
    #[error("task key {0} was already submitted")]
    DuplicateKey(String),
}

/// Terminal failure of a single task
#[derive(Debug)]
pub enum TaskError<E> {
    /// The task returned an error
    Failed(E),
    /// The task panicked or was cancelled before producing a result
    Panicked,
}

impl<E: fmt::Display> fmt::Display for TaskError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Failed(err) => err.fmt(f),
            TaskError::Panicked => write!(f, "task panicked before completing"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for TaskError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Failed(err) => err.source(),
            TaskError::Panicked => None,
        }
    }
}

/// Representative failure of a batch, for callers that treat any failure as fatal
#[derive(Debug)]
pub struct BatchFailure<K, E> {
    /// First failing key in submission order
    pub key: K,
    /// Its error
    pub error: TaskError<E>,
    /// Total number of failed tasks
    pub failed: usize,
}

/// Bounded fan-out/fan-in executor
pub struct Batch<K, V, E> {
    concurrency: usize,
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<(K, Result<V, E>)>,
    order: Vec<K>,
    submitted: HashSet<K>,
}

impl<K, V, E> Batch<K, V, E>
where
    K: Clone + Eq + Hash + fmt::Debug + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
{
    /// Create a batch running at most `concurrency` tasks at once (minimum 1)
    pub fn new(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            concurrency,
            semaphore: Arc::new(Semaphore::new(concurrency)),
            tasks: JoinSet::new(),
            order: Vec::new(),
            submitted: HashSet::new(),
        }
    }

    /// The effective concurrency ceiling
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Number of submitted tasks
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing was submitted
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Submit a task under a unique key
    ///
    /// Must be called from within a tokio runtime. The task starts as soon as
    /// a permit is free.
    pub fn go<F, Fut>(&mut self, key: K, task: F) -> Result<(), BatchError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        if !self.submitted.insert(key.clone()) {
            return Err(BatchError::DuplicateKey(format!("{:?}", key)));
        }
        self.order.push(key.clone());

        let semaphore = Arc::clone(&self.semaphore);
        self.tasks.spawn(async move {
            // The semaphore is never closed, so acquiring cannot fail
            let _permit = semaphore.acquire_owned().await.ok();
            let result = task().await;
            (key, result)
        });

        Ok(())
    }

    /// Wait for every submitted task and collect the per-key results
    pub async fn wait(mut self) -> BatchResult<K, V, E> {
        let mut entries = HashMap::with_capacity(self.order.len());

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok((key, result)) => {
                    entries.insert(key, result.map_err(TaskError::Failed));
                }
                Err(err) => warn!(error = %err, "batch task did not complete"),
            }
        }

        for key in &self.order {
            entries
                .entry(key.clone())
                .or_insert(Err(TaskError::Panicked));
        }

        BatchResult {
            order: self.order,
            entries,
        }
    }
}

/// Per-key results of a finished batch
#[derive(Debug)]
pub struct BatchResult<K, V, E> {
    order: Vec<K>,
    entries: HashMap<K, Result<V, TaskError<E>>>,
}

impl<K, V, E> BatchResult<K, V, E>
where
    K: Clone + Eq + Hash,
{
    /// Result for a key
    pub fn get<Q>(&self, key: &Q) -> Option<&Result<V, TaskError<E>>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Number of entries (one per submitted key)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no task was submitted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in submission order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// Successful entries in submission order
    pub fn successes(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order
            .iter()
            .filter_map(|key| match self.entries.get(key) {
                Some(Ok(value)) => Some((key, value)),
                _ => None,
            })
    }

    /// Failed entries in submission order
    pub fn failures(&self) -> impl Iterator<Item = (&K, &TaskError<E>)> {
        self.order
            .iter()
            .filter_map(|key| match self.entries.get(key) {
                Some(Err(err)) => Some((key, err)),
                _ => None,
            })
    }

    /// Returns true if every task succeeded
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// The representative failure: first failing key in submission order
    pub fn first_failure(&self) -> Option<(&K, &TaskError<E>)> {
        self.failures().next()
    }

    /// Convert into the success mapping, or the representative failure
    pub fn into_result(mut self) -> Result<HashMap<K, V>, BatchFailure<K, E>> {
        let failed = self.failures().count();

        for key in &self.order {
            if let Some(Err(_)) = self.entries.get(key) {
                if let Some(Err(error)) = self.entries.remove(key) {
                    return Err(BatchFailure {
                        key: key.clone(),
                        error,
                        failed,
                    });
                }
            }
        }

        Ok(self
            .entries
            .into_iter()
            .filter_map(|(key, result)| result.ok().map(|value| (key, value)))
            .collect())
    }
}
