//! # DispatchOptions
//!
//! The `DispatchOptions` struct configures how a generation's fitness is computed: how
//! many worker threads score individuals, how many pending individuals it takes before the
//! worker pool is used at all, and how worker threads are named.
//!
//! ## Example
//!
//! ```rust
//! use rotagen::evolution::options::DispatchOptions;
//!
//! // Create a new DispatchOptions instance with custom parameters
//! let custom_options = DispatchOptions::builder()
//!     .num_threads(4)
//!     .parallel_threshold(32)
//!     .build();
//! assert_eq!(custom_options.get_num_threads(), 4);
//!
//! // Create a new DispatchOptions instance with default parameters
//! let default_options = DispatchOptions::default();
//! assert_eq!(default_options.get_num_threads(), 0);
//! ```
//!
//! ## Fields
//!
//! - `num_threads`: Size of the worker pool. Zero sizes it to the available parallelism.
//! - `parallel_threshold`: Minimum number of individuals to score before the worker pool
//!   is used; smaller batches are scored on the calling thread.
//! - `thread_name_prefix`: Prefix of the worker thread names.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;

pub(crate) const DEFAULT_PARALLEL_THRESHOLD: usize = 16;
const DEFAULT_THREAD_NAME_PREFIX: &str = "rota-eval";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DispatchOptions {
    num_threads: usize,
    /// Minimum number of individuals to process in parallel
    parallel_threshold: usize,
    thread_name_prefix: String,
}

impl DispatchOptions {
    pub fn new(num_threads: usize, parallel_threshold: usize) -> Self {
        Self {
            num_threads,
            parallel_threshold,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }

    pub fn get_num_threads(&self) -> usize {
        self.num_threads
    }

    /// Returns the minimum number of individuals to process in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_thread_name_prefix(&self) -> &str {
        &self.thread_name_prefix
    }

    /// Sets the number of worker threads.
    pub fn set_num_threads(&mut self, num_threads: usize) {
        self.num_threads = num_threads;
    }

    /// Sets the parallel threshold.
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Builds the worker pool these options describe.
    pub fn build_pool(&self) -> Result<Arc<ThreadPool>> {
        let prefix = self.thread_name_prefix.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .thread_name(move |index| format!("{}-{}", prefix, index))
            .build()?;
        Ok(Arc::new(pool))
    }

    /// Returns a builder for creating a `DispatchOptions` instance.
    pub fn builder() -> DispatchOptionsBuilder {
        DispatchOptionsBuilder::default()
    }
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self::new(0, DEFAULT_PARALLEL_THRESHOLD)
    }
}

/// Builder for `DispatchOptions`.
///
/// Provides a fluent interface for constructing `DispatchOptions` instances.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptionsBuilder {
    num_threads: Option<usize>,
    parallel_threshold: Option<usize>,
    thread_name_prefix: Option<String>,
}

impl DispatchOptionsBuilder {
    /// Sets the number of worker threads.
    pub fn num_threads(mut self, value: usize) -> Self {
        self.num_threads = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Sets the worker thread name prefix.
    pub fn thread_name_prefix(mut self, value: impl Into<String>) -> Self {
        self.thread_name_prefix = Some(value.into());
        self
    }

    /// Builds the `DispatchOptions` instance.
    pub fn build(self) -> DispatchOptions {
        DispatchOptions {
            num_threads: self.num_threads.unwrap_or(0),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
            thread_name_prefix: self
                .thread_name_prefix
                .unwrap_or_else(|| DEFAULT_THREAD_NAME_PREFIX.to_string()),
        }
    }
}
