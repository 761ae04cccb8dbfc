use std::thread;
use std::time::Duration;

use crate::consts;

// -----------------------------------------------------------------------------
// Runtime Config
// -----------------------------------------------------------------------------

/// Options used to build the tokio runtime driving [`init::block_on`].
///
/// [`init::block_on`]: crate::init::block_on
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
  // ---------------------------------------------------------------------------
  // Tokio Runtime Configuration
  // ---------------------------------------------------------------------------
  pub rt_event_interval: u32,
  pub rt_global_queue_interval: u32,
  pub rt_max_blocking_threads: usize,
  pub rt_shutdown_timeout: Duration,
  pub rt_thread_keep_alive: Duration,
  pub rt_thread_stack_size: usize,
  pub rt_worker_threads: usize,
  // ---------------------------------------------------------------------------
  // Tracing Subscriber Configuration
  // ---------------------------------------------------------------------------
  pub tracing_source_file: bool,
  pub tracing_source_line: bool,
  pub tracing_source_name: bool,
  pub tracing_thread_info: bool,
  pub tracing_verbose: bool,
  pub tracing_very_verbose: bool,
}

impl RuntimeConfig {
  #[inline]
  pub fn new() -> Self {
    Self {
      rt_event_interval: consts::DEFAULT_EVENT_INTERVAL,
      rt_global_queue_interval: consts::DEFAULT_GLOBAL_QUEUE_INTERVAL,
      rt_max_blocking_threads: consts::DEFAULT_MAX_BLOCKING_THREADS,
      rt_shutdown_timeout: consts::SHUTDOWN_TIMEOUT,
      rt_thread_keep_alive: consts::DEFAULT_THREAD_KEEP_ALIVE,
      rt_thread_stack_size: consts::DEFAULT_THREAD_STACK_SIZE,
      rt_worker_threads: available_cpus(),
      tracing_source_file: false,
      tracing_source_line: false,
      tracing_source_name: false,
      tracing_thread_info: true,
      tracing_verbose: true,
      tracing_very_verbose: false,
    }
  }

  #[inline]
  pub const fn tracing_filter(&self) -> tracing::Level {
    if self.tracing_very_verbose {
      tracing::Level::TRACE
    } else if self.tracing_verbose {
      tracing::Level::DEBUG
    } else {
      tracing::Level::INFO
    }
  }
}

impl Default for RuntimeConfig {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

/// Returns the number of available CPU cores.
///
/// Falls back to [`DEFAULT_PARALLELISM`] if CPU detection fails.
///
/// [`DEFAULT_PARALLELISM`]: consts::DEFAULT_PARALLELISM
pub fn available_cpus() -> usize {
  match thread::available_parallelism() {
    Ok(count) => count.get(),
    Err(_) => consts::DEFAULT_PARALLELISM,
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use tracing::Level;

  use crate::erts::RuntimeConfig;

  #[test]
  fn test_tracing_filter() {
    let mut config: RuntimeConfig = RuntimeConfig::new();

    config.tracing_verbose = false;
    assert_eq!(config.tracing_filter(), Level::INFO);

    config.tracing_verbose = true;
    assert_eq!(config.tracing_filter(), Level::DEBUG);

    config.tracing_very_verbose = true;
    assert_eq!(config.tracing_filter(), Level::TRACE);
  }

  #[test]
  fn test_default_workers() {
    assert!(RuntimeConfig::default().rt_worker_threads >= 1);
  }
}
