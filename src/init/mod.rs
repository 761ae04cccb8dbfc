//! Runtime bootstrap.

use std::backtrace::BacktraceStatus;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder;
use tokio::runtime::Runtime as TokioRuntime;
use tracing::Level;
use tracing::Span;
use tracing::debug;
use tracing::info;
use tracing::span;

use crate::erts::Env;
use crate::erts::EnvConfig;
use crate::erts::RuntimeConfig;
use crate::error::Exception;
use crate::error::ExceptionClass;
use crate::error::ExceptionGroup;
use crate::utils::measure_fn;

/// Runs `f` to completion on a fresh multi-threaded tokio runtime.
///
/// `f` receives a new [`Env`] to spawn processes with. Once its future
/// resolves, the runtime is shut down, waiting at most
/// [`rt_shutdown_timeout`] for outstanding tasks.
///
/// [`rt_shutdown_timeout`]: RuntimeConfig::rt_shutdown_timeout
pub fn block_on<F, Fut, T>(config: RuntimeConfig, f: F) -> Result<T, Exception>
where
  F: FnOnce(Arc<Env>) -> Fut,
  Fut: Future<Output = T>,
{
  if config.rt_worker_threads == 0 {
    return Err(Exception::new(
      ExceptionClass::Error,
      ExceptionGroup::BadArg,
      "worker thread count must be non-zero",
    ));
  }

  if let Err(error) = init_tracing_subscriber(&config) {
    eprintln!("failed to set tracing subscriber:");
    eprintln!("    {}", error.error());

    if error.trace().status() == BacktraceStatus::Captured {
      eprintln!("{}", error.trace());
    }
  }

  let span: Span = span!(target: "procsys", Level::DEBUG, "init::block_on");
  let runtime: TokioRuntime = build_tokio_runtime(&config)?;

  debug!(target: "procsys", parent: &span, workers = config.rt_worker_threads, "initializing");

  let output: T = runtime.block_on(f(Env::new(EnvConfig::default())));

  info!(
    target: "procsys",
    parent: &span,
    timeout = ?config.rt_shutdown_timeout,
    "system stopping",
  );

  let ((), elapsed): ((), Duration) = measure_fn(|| {
    runtime.shutdown_timeout(config.rt_shutdown_timeout);
  });

  info!(target: "procsys", parent: &span, elapsed = ?elapsed, "system stopped");

  Ok(output)
}

/// Installs the global tracing subscriber.
#[cfg(feature = "tracing")]
pub fn init_tracing_subscriber(config: &RuntimeConfig) -> Result<(), Exception> {
  use tracing_subscriber::FmtSubscriber;
  use tracing_subscriber::fmt::format;
  use tracing_subscriber::util::SubscriberInitExt;

  FmtSubscriber::builder()
    .event_format(format().compact())
    .log_internal_errors(true)
    .with_ansi(true)
    .with_file(config.tracing_source_file)
    .with_level(true)
    .with_line_number(config.tracing_source_line)
    .with_max_level(config.tracing_filter())
    .with_target(config.tracing_source_name)
    .with_thread_ids(config.tracing_thread_info)
    .with_thread_names(config.tracing_thread_info)
    .finish()
    .try_init()
    .map_err(error)
}

/// Installs the global tracing subscriber.
///
/// Does nothing unless the `tracing` feature is enabled.
#[cfg(not(feature = "tracing"))]
pub fn init_tracing_subscriber(_config: &RuntimeConfig) -> Result<(), Exception> {
  Ok(())
}

/// Builds the tokio multi-threaded runtime with the given configuration.
fn build_tokio_runtime(config: &RuntimeConfig) -> Result<TokioRuntime, Exception> {
  Builder::new_multi_thread()
    .enable_time()
    .event_interval(config.rt_event_interval)
    .global_queue_interval(config.rt_global_queue_interval)
    .max_blocking_threads(config.rt_max_blocking_threads)
    .thread_keep_alive(config.rt_thread_keep_alive)
    .thread_name_fn(next_worker_name)
    .thread_stack_size(config.rt_thread_stack_size)
    .worker_threads(config.rt_worker_threads)
    .build()
    .map_err(error)
}

/// Generates a unique name for the next worker thread.
#[inline]
fn next_worker_name() -> String {
  format!("procsys-worker-{:0>2}", next_worker_id())
}

#[inline]
fn next_worker_id() -> u64 {
  static ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
  ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
}

/// Returns a generic `SysInv` exception with the given error message.
#[cold]
fn error<E>(error: E) -> Exception
where
  E: Display,
{
  Exception::new(ExceptionClass::Error, ExceptionGroup::SysInv, error)
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use crate::erts::Env;
  use crate::erts::RuntimeConfig;
  use crate::error::Exception;
  use crate::error::ExceptionGroup;
  use crate::init;

  #[test]
  fn test_zero_workers() {
    let mut config: RuntimeConfig = RuntimeConfig::new();

    config.rt_worker_threads = 0;

    let result: Result<(), Exception> = init::block_on(config, |_env: Arc<Env>| async {});

    assert_eq!(result.map_err(|error| error.group()).err(), Some(ExceptionGroup::BadArg));
  }

  #[test]
  fn test_block_on() {
    let mut config: RuntimeConfig = RuntimeConfig::new();

    config.rt_worker_threads = 2;

    let output: Result<u32, Exception> = init::block_on(config, |_env: Arc<Env>| async { 42 });

    assert_eq!(output.ok(), Some(42));
  }
}
