use std::{
    any::Any,
    collections::VecDeque,
    mem,
    panic::{self, AssertUnwindSafe},
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    thread,
};

use super::{ShutdownMode, SubmitError, Task};

struct State {
    queue: VecDeque<Task>,
    shutdown: Option<ShutdownMode>,
}

/// State shared between the pool handle and its workers.
pub(super) struct Shared {
    state: Mutex<State>,
    available: Condvar,
    // The payload of the first task that panicked.
    panic: Mutex<Option<Box<dyn Any + Send>>>,
}

impl Shared {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                shutdown: None,
            }),
            available: Condvar::new(),
            panic: Mutex::new(None),
        }
    }

    // Tasks never run while the lock is held, so a poisoned mutex
    // still guards a consistent queue.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn push(&self, task: Task) -> Result<(), SubmitError> {
        {
            let mut state = self.lock();
            if state.shutdown.is_some() {
                return Err(SubmitError);
            }

            state.queue.push_back(task);
        }

        self.available.notify_one();
        Ok(())
    }

    /// Marks the pool as shutting down and wakes every worker.
    ///
    /// Returns the number of tasks dropped from the queue.
    pub fn signal(&self, mode: ShutdownMode) -> usize {
        let backlog = {
            let mut state = self.lock();
            if state.shutdown.is_some() {
                return 0;
            }

            state.shutdown = Some(mode);
            match mode {
                ShutdownMode::Discard => mem::take(&mut state.queue),
                ShutdownMode::Drain => VecDeque::new(),
            }
        };

        self.available.notify_all();

        // Dropped outside the lock; captured state may run arbitrary
        // destructors.
        backlog.len()
    }

    fn next_task(&self) -> Option<Task> {
        let mut state = self.lock();
        loop {
            match state.shutdown {
                Some(ShutdownMode::Discard) => return None,
                Some(ShutdownMode::Drain) => return state.queue.pop_front(),
                None => {
                    if let Some(task) = state.queue.pop_front() {
                        return Some(task);
                    }
                }
            }

            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Takes the payload of the first task that panicked, if any.
    pub fn take_panic(&self) -> Option<Box<dyn Any + Send>> {
        self.panic
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn run_worker(&self) {
        log::trace!("worker started");
        while let Some(task) = self.next_task() {
            // A panicking task must not take the worker down with it,
            // or the remaining queue would never be served.
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
                let name = thread::current().name().unwrap_or("worker").to_owned();
                log::error!("task panicked on {name}");

                let mut slot = self.panic.lock().unwrap_or_else(PoisonError::into_inner);
                if slot.is_none() {
                    *slot = Some(payload);
                }
            }
        }
        log::trace!("worker exiting");
    }
}
