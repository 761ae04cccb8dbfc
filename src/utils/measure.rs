//! Basic execution timing utilities.

use std::time::Duration;
use std::time::Instant;

/// Runs `f` and returns its output together with the elapsed time.
#[inline(always)]
pub(crate) fn measure_fn<F, T>(f: F) -> (T, Duration)
where
  F: FnOnce() -> T,
{
  let instant: Instant = Instant::now();
  let output: T = f();

  (output, instant.elapsed())
}
