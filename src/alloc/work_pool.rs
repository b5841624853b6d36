//! A bounded worker pool for partitioned allocation work.

use futures::Future;
use futures::future;
use futures_cpupool::{Builder, CpuPool};

use cmn::CmnResult;

/// A fixed-size thread pool dispatching independent allocation
/// partitions.
///
/// Workers share no mutable state; each job owns (or `Arc`-shares,
/// read-only) everything it touches and returns an independently owned
/// partial result. The first job error fails the whole batch: no partial
/// results are returned and outstanding jobs are abandoned when their
/// futures drop.
pub struct WorkPool {
    pool: CpuPool,
    size: usize,
}

impl WorkPool {
    pub fn new(n_jobs: usize) -> WorkPool {
        let size = n_jobs.max(1);
        let pool = Builder::new()
            .pool_size(size)
            .name_prefix("densit-worker-")
            .create();
        WorkPool { pool, size }
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs every job on the pool and collects the results in submission
    /// order, failing fast on the first error.
    pub fn run_all<T, F>(&self, jobs: Vec<F>) -> CmnResult<Vec<T>>
            where T: Send + 'static,
                  F: FnOnce() -> CmnResult<T> + Send + 'static {
        let futures: Vec<_> = jobs.into_iter()
            .map(|job| self.pool.spawn_fn(job))
            .collect();

        future::join_all(futures).wait()
    }
}
