//! Background task group with a first-error barrier
//!
//! Tasks are handed to rayon and counted; [`TaskGroup::wait`] blocks until
//! the count drops back to zero and reports the first failure the group
//! ever recorded. The failure is latched: every later wait reports it
//! again and later failures are discarded. Panics inside a task are caught
//! and reported as [`Error::TaskPanicked`] so the barrier never hangs.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use sheetstream_core::{Error, Result};

#[derive(Default)]
struct Inner {
    pending: usize,
    first_error: Option<Error>,
}

#[derive(Default)]
struct State {
    inner: Mutex<Inner>,
    idle: Condvar,
}

impl State {
    fn complete(&self, outcome: Result<()>) {
        let mut inner = self.inner.lock();
        if let Err(err) = outcome {
            if inner.first_error.is_none() {
                inner.first_error = Some(err);
            } else {
                log::debug!("dropping background error after the first: {err}");
            }
        }
        inner.pending -= 1;
        if inner.pending == 0 {
            self.idle.notify_all();
        }
    }
}

/// Counts in-flight background tasks and keeps the first error
#[derive(Default)]
pub(crate) struct TaskGroup {
    state: Arc<State>,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl TaskGroup {
    pub(crate) fn new(pool: Option<Arc<rayon::ThreadPool>>) -> Self {
        Self {
            state: Arc::default(),
            pool,
        }
    }

    /// Schedule `task`
    ///
    /// The task (and everything it captured) is dropped before it is
    /// counted as finished.
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.state.inner.lock().pending += 1;
        let state = Arc::clone(&self.state);
        let job = move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task))
                .unwrap_or_else(|payload| Err(Error::TaskPanicked(panic_message(payload.as_ref()))));
            state.complete(outcome);
        };
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
    }

    /// Block until every scheduled task has finished
    ///
    /// Returns the first error the group recorded, on this and every later
    /// call. On a worker thread of the pool the tasks run on, the caller
    /// executes queued work itself instead of parking, so a barrier inside
    /// `ThreadPool::install` or a parallel iterator still makes progress.
    pub(crate) fn wait(&self) -> Result<()> {
        if self.on_task_pool() {
            while self.pending() > 0 {
                if !matches!(rayon::yield_now(), Some(rayon::Yield::Executed)) {
                    std::thread::yield_now();
                }
            }
        }

        let mut inner = self.state.inner.lock();
        while inner.pending > 0 {
            self.state.idle.wait(&mut inner);
        }
        match &inner.first_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn on_task_pool(&self) -> bool {
        match &self.pool {
            Some(pool) => pool.current_thread_index().is_some(),
            None => rayon::current_thread_index().is_some(),
        }
    }

    /// Number of tasks not finished yet
    pub(crate) fn pending(&self) -> usize {
        self.state.inner.lock().pending
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_wait_without_tasks() {
        let group = TaskGroup::default();
        assert!(group.wait().is_ok());
        assert_eq!(group.pending(), 0);
    }

    #[test]
    fn test_wait_runs_everything() {
        let group = TaskGroup::default();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            group.spawn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        group.wait().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_first_error_is_latched() {
        let group = TaskGroup::default();
        group.spawn(|| Err(Error::ValueOverrideConflict { col: 1, row: 1 }));
        assert!(group.wait().unwrap_err().is_value_conflict());

        // a later failure does not replace the first one
        group.spawn(|| Err(Error::StyleOverrideConflict { col: 2, row: 2 }));
        assert!(group.wait().unwrap_err().is_value_conflict());
        assert!(group.wait().unwrap_err().is_value_conflict());
    }

    #[test]
    fn test_wait_waits_for_slow_tasks_after_an_error() {
        let group = TaskGroup::default();
        let done = Arc::new(AtomicUsize::new(0));
        group.spawn(|| Err(Error::InvalidCoordinate { col: 0, row: 1 }));
        for _ in 0..4 {
            let done = Arc::clone(&done);
            group.spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                done.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        let err = group.wait().unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { .. }));
        assert_eq!(done.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_panic_becomes_error() {
        let group = TaskGroup::default();
        group.spawn(|| panic!("boom"));
        match group.wait() {
            Err(Error::TaskPanicked(msg)) => assert_eq!(msg, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_wait_inside_single_thread_pool() {
        let pool = Arc::new(rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap());
        let group = TaskGroup::new(Some(Arc::clone(&pool)));
        let counter = Arc::new(AtomicUsize::new(0));

        pool.install(|| {
            for _ in 0..5 {
                let counter = Arc::clone(&counter);
                group.spawn(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                });
            }
            // the only worker is the caller, so it has to run the tasks
            group.wait().unwrap();
        });
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_dedicated_pool() {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let group = TaskGroup::new(Some(Arc::new(pool)));
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            group.spawn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        group.wait().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }
}
