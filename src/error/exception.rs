use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::error::ExceptionClass;
use crate::error::ExceptionGroup;

/// A structured runtime error with class, group, message, and backtrace.
///
/// # Display Format
///
/// Exceptions format as: `{class}:{group} - {message}`
///
/// Example: `error:badarg - worker thread count must be non-zero`
pub struct Exception {
  class: ExceptionClass,
  group: ExceptionGroup,
  error: String,
  trace: Backtrace,
}

impl Exception {
  /// Creates a new exception with the given class, group, and message.
  ///
  /// Captures a backtrace at the call site when `RUST_BACKTRACE` allows it.
  #[inline]
  pub fn new<T>(class: ExceptionClass, group: ExceptionGroup, error: T) -> Self
  where
    T: Display,
  {
    Self {
      class,
      group,
      error: error.to_string(),
      trace: Backtrace::capture(),
    }
  }

  /// Returns the exception's severity class.
  #[inline]
  pub const fn class(&self) -> ExceptionClass {
    self.class
  }

  /// Returns the exception's error category.
  #[inline]
  pub const fn group(&self) -> ExceptionGroup {
    self.group
  }

  /// Returns the human-readable error message.
  #[inline]
  pub fn error(&self) -> &str {
    self.error.as_str()
  }

  /// Returns the captured backtrace.
  #[inline]
  pub const fn trace(&self) -> &Backtrace {
    &self.trace
  }
}

impl Debug for Exception {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for Exception {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "{}:{} - {}", self.class, self.group.label(), self.error)
  }
}

impl Error for Exception {}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::backtrace::BacktraceStatus;

  use crate::error::Exception;
  use crate::error::ExceptionClass;
  use crate::error::ExceptionGroup;

  #[test]
  fn test_accessors() {
    let exception: Exception = Exception::new(ExceptionClass::Error, ExceptionGroup::BadArg, "bad");

    assert_eq!(exception.class(), ExceptionClass::Error);
    assert_eq!(exception.group(), ExceptionGroup::BadArg);
    assert_eq!(exception.error(), "bad");
    assert!(matches!(
      exception.trace().status(),
      BacktraceStatus::Captured | BacktraceStatus::Disabled | BacktraceStatus::Unsupported,
    ));
  }

  #[test]
  fn test_display() {
    let exception: Exception = Exception::new(ExceptionClass::Error, ExceptionGroup::SysInv, 42);

    assert_eq!(format!("{exception}"), "error:sysinv - 42");
    assert_eq!(format!("{exception:?}"), "error:sysinv - 42");
  }
}
