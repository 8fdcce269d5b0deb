use std::{
    env, io, mem, panic,
    sync::{Arc, Mutex, PoisonError},
    thread::{self, JoinHandle},
};

use thiserror::Error;

mod shared;
use shared::Shared;

const OSUDB_WORKER_THREADS: &str = "OSUDB_WORKER_THREADS";

const WORKER_NAME: &str = "osudb-worker";
const WORKER_STACK: usize = 1_048_576;

/// A unit of deferred work to run on the pool.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Errors that may occur when creating a [`WorkerPool`].
#[derive(Debug, Error)]
pub enum PoolError {
    /// The thread count from the environment could not be parsed.
    #[error(
        "invalid value in {}; must be a natural number",
        OSUDB_WORKER_THREADS
    )]
    BadConfiguration,

    /// A pool was requested with zero threads.
    #[error("a worker pool needs at least one thread")]
    NoWorkers,

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// The error returned when submitting to a pool that is shutting down.
///
/// The rejected task is dropped without being run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("worker pool is shutting down")]
pub struct SubmitError;

/// What happens to queued tasks that have not started yet when the
/// pool shuts down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Pending tasks are dropped without running.
    ///
    /// Tasks which are already running are still allowed to finish.
    #[default]
    Discard,

    /// Workers keep going until the queue is empty.
    Drain,
}

fn available_threads() -> Result<usize, PoolError> {
    match env::var(OSUDB_WORKER_THREADS) {
        Ok(value) => value.parse().map_err(|_| PoolError::BadConfiguration),

        Err(_) => Ok(thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)),
    }
}

/// A fixed set of worker threads executing tasks from a FIFO queue.
///
/// Tasks submitted from the same thread are started in the order of
/// submission. Nothing is guaranteed about the order in which they
/// complete, or about tasks submitted concurrently from different
/// threads.
///
/// Dropping the pool is equivalent to [`WorkerPool::shutdown`] with
/// [`ShutdownMode::Discard`] and blocks until all workers exited.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    nthreads: usize,
}

impl WorkerPool {
    /// Creates a new pool and spawns `nthreads` workers right away.
    pub fn new(nthreads: usize) -> Result<Self, PoolError> {
        if nthreads == 0 {
            return Err(PoolError::NoWorkers);
        }

        let pool = Self {
            shared: Arc::new(Shared::new()),
            workers: Mutex::new(Vec::with_capacity(nthreads)),
            nthreads,
        };

        for id in 0..nthreads {
            let shared = Arc::clone(&pool.shared);
            let handle = thread::Builder::new()
                .name(format!("{WORKER_NAME}-{id}"))
                .stack_size(WORKER_STACK)
                .spawn(move || shared.run_worker())?;

            pool.workers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(handle);
        }

        log::debug!("spawned {nthreads} worker threads");
        Ok(pool)
    }

    /// Creates a pool sized for the current configuration.
    ///
    /// The number of threads is read from the `OSUDB_WORKER_THREADS`
    /// environment variable. If not set, falls back to
    /// [`thread::available_parallelism`].
    #[inline]
    pub fn from_env() -> Result<Self, PoolError> {
        Self::new(available_threads()?)
    }

    /// Gets the number of worker threads in the pool.
    #[inline]
    pub fn threads(&self) -> usize {
        self.nthreads
    }

    /// Gets the number of tasks waiting for a worker.
    #[inline]
    pub fn queued(&self) -> usize {
        self.shared.queued()
    }

    /// Enqueues `f` to be run on one of the workers.
    ///
    /// This returns as soon as the task is queued. Once shutdown was
    /// requested, the task is rejected instead.
    ///
    /// A panic inside `f` is not swallowed: it is re-raised by
    /// [`WorkerPool::shutdown`] (or on drop).
    pub fn submit<F>(&self, f: F) -> Result<(), SubmitError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.push(Box::new(f))
    }

    /// Signals shutdown to all workers and waits for them to exit.
    ///
    /// Only the first call picks the [`ShutdownMode`]; subsequent
    /// calls just wait for the workers. Must not be called from
    /// inside a task.
    ///
    /// # Panics
    ///
    /// If any task panicked, the first panic is resumed on the calling
    /// thread once all workers exited. Workers survive panicking tasks,
    /// so the rest of the queue is still served according to `mode`.
    pub fn shutdown(&self, mode: ShutdownMode) {
        let discarded = self.shared.signal(mode);
        if discarded != 0 {
            log::debug!("discarded {discarded} pending tasks on shutdown");
        }

        let workers = mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner));
        for worker in workers {
            let name = worker.thread().name().unwrap_or(WORKER_NAME).to_owned();
            if worker.join().is_err() {
                log::error!("{name} terminated abnormally");
            }
        }

        if let Some(payload) = self.shared.take_panic() {
            if !thread::panicking() {
                panic::resume_unwind(payload);
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown(ShutdownMode::Discard);
    }
}
