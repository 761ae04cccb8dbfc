use bitflags::bitflags;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

bitflags! {
  /// Flags altering the behavior of a process.
  #[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
  pub struct ProcessFlags: u32 {
    /// Convert incoming exit signals into [`ExitMessage`]s.
    ///
    /// [`ExitMessage`]: crate::erts::ExitMessage
    const TRAP_EXIT = 1 << 1;
  }
}

/// Lifecycle state of a process.
///
/// States only move forward: `Starting → Running → Stopping → Terminated`.
///
/// [`GenProc::state`] is only reachable from the process itself, so the body
/// observes `Running`. `Stopping` and `Terminated` are entered after the body
/// returned; they show up in the lifecycle `debug` events and in the `Debug`
/// output of the process. Other processes use [`Pid::alive`] instead.
///
/// [`GenProc::state`]: crate::proc::GenProc::state
/// [`Pid::alive`]: crate::core::Pid::alive
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProcState {
  /// Created, body not yet invoked.
  Starting,
  /// Body executing.
  Running,
  /// Body returned or crashed; broadcasting termination.
  Stopping,
  /// Termination gate fired.
  Terminated,
}

impl ProcState {
  #[inline]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Starting => "starting",
      Self::Running => "running",
      Self::Stopping => "stopping",
      Self::Terminated => "terminated",
    }
  }
}

impl Display for ProcState {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.as_str())
  }
}
