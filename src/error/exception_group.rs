use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Exception category indicating the nature of the error.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExceptionGroup {
  /// Invalid function argument or parameter.
  ///
  /// Indicates the caller provided configuration that violates preconditions.
  BadArg,
  /// Invalid system operation or state.
  ///
  /// Indicates an operation that cannot be performed in the current system state.
  SysInv,
}

impl ExceptionGroup {
  #[inline]
  pub(crate) const fn label(&self) -> &'static str {
    match self {
      Self::BadArg => "badarg",
      Self::SysInv => "sysinv",
    }
  }
}

impl Display for ExceptionGroup {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::BadArg => f.write_str("(BadArg) errors were found with the given argument(s)"),
      Self::SysInv => f.write_str("(SysInv) a system invariant has been broken"),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::error::ExceptionGroup;

  #[test]
  fn test_display() {
    let badarg: String = format!("{}", ExceptionGroup::BadArg);
    let sysinv: String = format!("{}", ExceptionGroup::SysInv);

    assert!(badarg.starts_with("(BadArg)"));
    assert!(sysinv.starts_with("(SysInv)"));
  }

  #[test]
  fn test_label() {
    assert_eq!(ExceptionGroup::BadArg.label(), "badarg");
    assert_eq!(ExceptionGroup::SysInv.label(), "sysinv");
  }
}
