use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Severity of an [`Exception`].
///
/// [`Exception`]: crate::error::Exception
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExceptionClass {
  /// The runtime could not be started.
  Error,
}

impl ExceptionClass {
  /// Returns the lowercase name of the class.
  #[inline]
  pub const fn label(&self) -> &'static str {
    match self {
      Self::Error => "error",
    }
  }
}

impl Display for ExceptionClass {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.label())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::error::ExceptionClass;

  #[test]
  fn test_display() {
    assert_eq!(format!("{}", ExceptionClass::Error), "error");
    assert_eq!(ExceptionClass::Error.label(), "error");
  }
}
