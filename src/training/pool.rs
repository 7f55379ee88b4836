use crate::error::{GraphmatError, Result};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

/// Decrements the pending count when a task finishes, including by panic.
struct PendingGuard(Arc<Pending>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut count = self.0.count.lock();
        *count -= 1;
        if *count == 0 {
            self.0.idle.notify_all();
        }
    }
}

/// Handle to a fixed set of worker threads.
///
/// Cloning is cheap and every clone drives the same threads. Tasks can be
/// submitted fire-and-forget with [`WorkerPool::submit`] and drained with
/// [`WorkerPool::wait_for_conclusion`], or submitted inside
/// [`WorkerPool::scope`], which may borrow from the caller and returns only
/// once every task it spawned has finished.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    pool: Arc<rayon::ThreadPool>,
    pending: Arc<Pending>,
}

impl WorkerPool {
    /// Starts `n_threads` workers, or one per available core when `n_threads` is 0.
    pub fn new(n_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|index| format!("graphmat-worker-{}", index))
            .panic_handler(|_| error!("worker task panicked"))
            .build()?;
        debug!(threads = pool.current_num_threads(), "started worker pool");
        Ok(Self {
            pool: Arc::new(pool),
            pending: Arc::default(),
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queues `task` on the workers without waiting for it.
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *self.pending.count.lock() += 1;
        let guard = PendingGuard(Arc::clone(&self.pending));
        self.pool.spawn(move || {
            let _guard = guard;
            task();
        });
    }

    /// Blocks until every task passed to [`WorkerPool::submit`] has finished.
    ///
    /// Must not be called from inside a submitted task.
    pub fn wait_for_conclusion(&self) {
        let mut count = self.pending.count.lock();
        while *count > 0 {
            self.pending.idle.wait(&mut count);
        }
    }

    /// Runs `op`, which may submit borrowing tasks through the given
    /// [`EpochScope`], and waits for all of them.
    ///
    /// Returns the first error reported by a task. A panicking task resumes
    /// its panic here once the remaining tasks are done.
    pub fn scope<'scope, F>(&self, op: F) -> Result<()>
    where
        F: for<'a> FnOnce(&EpochScope<'a, 'scope>) + Send,
    {
        let failure = Arc::new(Mutex::new(None));
        self.pool.scope(|scope| {
            op(&EpochScope {
                scope,
                failure: Arc::clone(&failure),
            })
        });
        let first = failure.lock().take();
        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Submission handle passed to the closure of [`WorkerPool::scope`].
pub struct EpochScope<'a, 'scope> {
    scope: &'a rayon::Scope<'scope>,
    failure: Arc<Mutex<Option<GraphmatError>>>,
}

impl<'scope> EpochScope<'_, 'scope> {
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce() -> Result<()> + Send + 'scope,
    {
        let failure = Arc::clone(&self.failure);
        self.scope.spawn(move |_| {
            if let Err(err) = task() {
                let mut failure = failure.lock();
                if failure.is_none() {
                    *failure = Some(err);
                }
            }
        });
    }
}
