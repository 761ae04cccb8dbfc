use std::any::Any;
use std::borrow::Cow;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::error::ProcError;

/// Reason describing why a process stopped executing.
///
/// Exit reasons serve two primary purposes:
///
/// 1. **Diagnostic**: Explain what caused process termination
/// 2. **Propagation**: Determine how linked/monitored processes react
///
/// # Standard Exit Reasons
///
/// - [`Exit::NORMAL`]: Clean shutdown with no errors
/// - [`Exit::KILL`]: Request for unconditional termination (input only)
/// - [`Exit::KILLED`]: A kill request that has been applied
/// - [`Exit::NOPROC`]: The target process does not exist
///
/// Any other string is a custom reason and is treated as abnormal.
///
/// # Examples
///
/// ```
/// use procsys::core::Exit;
///
/// let exit: Exit = Exit::from("timeout");
///
/// assert!(!exit.is_normal());
/// assert_eq!(exit.as_str(), "timeout");
/// ```
#[derive(Clone, Hash, PartialEq, Eq)]
#[repr(transparent)]
pub struct Exit {
  reason: Cow<'static, str>,
}

impl Exit {
  /// Exit reason indicating normal process termination.
  pub const NORMAL: Self = Self::from_static("normal");

  /// Exit reason requesting forced termination.
  ///
  /// A process receiving this reason terminates with [`Exit::KILLED`],
  /// regardless of its `trap_exit` flag.
  pub const KILL: Self = Self::from_static("kill");

  /// Exit reason reported by a process that was forcefully terminated.
  pub const KILLED: Self = Self::from_static("killed");

  /// Exit reason indicating a nonexistent or already terminated process.
  pub const NOPROC: Self = Self::from_static("noproc");

  #[inline]
  const fn from_static(reason: &'static str) -> Self {
    Self {
      reason: Cow::Borrowed(reason),
    }
  }

  /// Returns the exit reason as a string slice.
  #[inline]
  pub fn as_str(&self) -> &str {
    &self.reason
  }

  /// Returns `true` if this exit reason represents normal termination.
  #[inline]
  pub fn is_normal(&self) -> bool {
    self.as_str() == Self::NORMAL.as_str()
  }

  /// Returns `true` if this exit reason is a forced-kill request.
  #[inline]
  pub fn is_kill(&self) -> bool {
    self.as_str() == Self::KILL.as_str()
  }

  /// Returns `true` if this exit reason represents forced termination.
  #[inline]
  pub fn is_killed(&self) -> bool {
    self.as_str() == Self::KILLED.as_str()
  }

  /// Returns `true` if this exit reason represents a missing process.
  #[inline]
  pub fn is_noproc(&self) -> bool {
    self.as_str() == Self::NOPROC.as_str()
  }

  /// Creates an exit reason from a caught panic payload.
  pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
    match payload.downcast_ref::<&str>() {
      Some(error) => Self::from(error.to_string()),
      None => match payload.downcast_ref::<String>() {
        Some(error) => Self::from(error.clone()),
        None => Self::from(format!("unknown error ({payload:?})")),
      },
    }
  }
}

impl Debug for Exit {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for Exit {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.as_str())
  }
}

impl From<&'static str> for Exit {
  #[inline]
  fn from(other: &'static str) -> Self {
    Self::from_static(other)
  }
}

impl From<String> for Exit {
  #[inline]
  fn from(other: String) -> Self {
    Self {
      reason: Cow::Owned(other),
    }
  }
}

impl From<ProcError> for Exit {
  #[inline]
  fn from(other: ProcError) -> Self {
    match other {
      ProcError::NoProc => Self::NOPROC,
      ProcError::NilPid => Self::from_static(other.label()),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::panic;

  use crate::core::Exit;
  use crate::error::ProcError;

  #[test]
  fn test_is_normal() {
    assert!(Exit::NORMAL.is_normal());
    assert!(!Exit::KILL.is_normal());
    assert!(!Exit::KILLED.is_normal());
    assert!(!Exit::NOPROC.is_normal());
  }

  #[test]
  fn test_is_kill() {
    assert!(Exit::KILL.is_kill());
    assert!(!Exit::KILLED.is_kill());
    assert!(!Exit::NORMAL.is_kill());
  }

  #[test]
  fn test_is_killed() {
    assert!(Exit::KILLED.is_killed());
    assert!(!Exit::KILL.is_killed());
  }

  #[test]
  fn test_owned_matches_static() {
    let exit: Exit = Exit::from(String::from("normal"));

    assert!(exit.is_normal());
    assert_eq!(exit, Exit::NORMAL);
  }

  #[test]
  fn test_display() {
    assert_eq!(format!("{}", Exit::NORMAL), "normal");
    assert_eq!(format!("{}", Exit::KILL), "kill");
    assert_eq!(format!("{}", Exit::KILLED), "killed");
    assert_eq!(format!("{}", Exit::NOPROC), "noproc");
  }

  #[test]
  fn test_debug_equals_display() {
    let exit: Exit = Exit::from("shutdown");

    assert_eq!(format!("{exit}"), format!("{exit:?}"));
  }

  #[test]
  fn test_from_proc_error() {
    assert_eq!(Exit::from(ProcError::NoProc), Exit::NOPROC);
    assert_eq!(Exit::from(ProcError::NilPid).as_str(), "nilpid");
  }

  #[test]
  fn test_from_panic_str() {
    let payload = panic::catch_unwind(|| panic!("boom")).unwrap_err();

    assert_eq!(Exit::from_panic(&*payload).as_str(), "boom");
  }

  #[test]
  fn test_from_panic_string() {
    let payload = panic::catch_unwind(|| panic!("{} {}", "bad", 42)).unwrap_err();

    assert_eq!(Exit::from_panic(&*payload).as_str(), "bad 42");
  }

  #[test]
  fn test_from_panic_unknown() {
    let payload = panic::catch_unwind(|| panic::panic_any(7_u32)).unwrap_err();

    assert!(Exit::from_panic(&*payload).as_str().starts_with("unknown error"));
  }
}
