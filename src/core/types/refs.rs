use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Reference uniquely identifying a monitor within its environment.
///
/// References are issued by an [`Environment`] and are single-use: each one
/// names exactly one watch relationship.
///
/// # Format
///
/// References display as `#Ref<0.Env.Number>`.
///
/// [`Environment`]: crate::erts::Environment
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ref {
  env: u64,
  number: u64,
}

impl Ref {
  /// Creates a reference from its environment id and counter value.
  #[inline]
  pub const fn new(env: u64, number: u64) -> Self {
    Self { env, number }
  }

  /// Returns the id of the environment that issued this reference.
  #[inline]
  pub const fn env(&self) -> u64 {
    self.env
  }

  /// Returns the counter component.
  #[inline]
  pub const fn number(&self) -> u64 {
    self.number
  }
}

impl Debug for Ref {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for Ref {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "#Ref<0.{}.{}>", self.env, self.number)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
