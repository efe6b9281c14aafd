//! Rayon thread pool configuration for trial workloads.
//!
//! [WorkerPool::install] runs the Monte Carlo fold with a fixed worker count
//! (the `--workers` flag) or falls through to Rayon's global pool.

use rayon::ThreadPoolBuilder;

/// Number of worker threads used for parallel trial batches.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    /// If 0, use the global Rayon pool (all CPU cores).
    pub workers: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self { workers: 0 }
    }
}

impl WorkerPool {
    /// All available cores.
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run `f` under this pool's thread count. Trial results must not depend
    /// on the count; it only changes how batches are scheduled.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            f()
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
                .expect("Rayon thread pool");
            pool.install(f)
        }
    }
}
