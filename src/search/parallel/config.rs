//! Configuration for parallel search execution.

#![allow(dead_code)]

/// Configuration for parallel search execution.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads to spawn.
    pub num_workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
        }
    }
}

impl ParallelConfig {
    /// Set the number of workers (at least one).
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    /// Workers actually spawned for `jobs` independent subtrees.
    pub fn effective_workers(&self, jobs: usize) -> usize {
        self.num_workers.min(jobs).max(1)
    }
}
