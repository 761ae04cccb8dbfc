use std::fmt::Debug;
use std::time::Duration;

use crate::core::Exit;
use crate::core::Pid;

/// Observational hook invoked around control signal dispatch.
///
/// Tracers never influence control flow; their return values are ignored and
/// they are called synchronously from the process task.
pub trait Tracer: Debug + Send + Sync + 'static {
  /// Called before `label` runs with the given `payload`.
  fn trace_call(&self, pid: &Pid, label: &str, payload: &dyn Debug);

  /// Called after `label` completed.
  fn trace_result(
    &self,
    pid: &Pid,
    label: &str,
    payload: &dyn Debug,
    elapsed: Duration,
    result: &Result<(), Exit>,
  );
}

/// A [`Tracer`] forwarding every call to `tracing` at `TRACE` level.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct LogTracer;

impl Tracer for LogTracer {
  fn trace_call(&self, pid: &Pid, label: &str, payload: &dyn Debug) {
    tracing::trace!(target: "procsys::trace", pid = %pid, label, payload = ?payload, "call");
  }

  fn trace_result(
    &self,
    pid: &Pid,
    label: &str,
    payload: &dyn Debug,
    elapsed: Duration,
    result: &Result<(), Exit>,
  ) {
    match result {
      Ok(()) => {
        tracing::trace!(
          target: "procsys::trace",
          pid = %pid,
          label,
          payload = ?payload,
          elapsed = ?elapsed,
          "result",
        );
      }
      Err(exit) => {
        tracing::trace!(
          target: "procsys::trace",
          pid = %pid,
          label,
          payload = ?payload,
          elapsed = ?elapsed,
          exit = %exit,
          "result",
        );
      }
    }
  }
}
