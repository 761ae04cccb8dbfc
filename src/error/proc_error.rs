use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Failure to reach a process through its [`Pid`].
///
/// [`Pid`]: crate::core::Pid
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ProcError {
  /// The operation was invoked on [`Pid::NIL`].
  ///
  /// [`Pid::NIL`]: crate::core::Pid::NIL
  NilPid,
  /// The target process has terminated or is no longer accepting signals.
  NoProc,
}

impl ProcError {
  #[inline]
  pub(crate) const fn label(&self) -> &'static str {
    match self {
      Self::NilPid => "nilpid",
      Self::NoProc => "noproc",
    }
  }
}

impl Display for ProcError {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.label())
  }
}

impl Error for ProcError {}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
