//! Trait defining type-erased values usable within [`Term`].
//!
//! [`Term`]: crate::core::Term

use dyn_clone::DynClone;
use std::any::Any;
use std::fmt::Debug;

/// Trait implemented by all values stored inside a [`Term`].
///
/// [`Item`] is automatically implemented for all types that are
/// [`Any`] + [`Debug`] + [`Clone`] + [`PartialEq`] + [`Send`] + [`Sync`].
///
/// [`Term`]: crate::core::Term
pub trait Item: Any + Debug + DynClone + Send + Sync + 'static {
  /// Returns a shared reference to this value as [`Any`].
  fn as_any(&self) -> &(dyn Any + Send + Sync);

  /// Tests for `self` and `other` values to be equal.
  ///
  /// This is stricter than [`PartialEq`] because the types must be identical.
  fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl PartialEq for dyn Item {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.dyn_eq(other.as_any())
  }
}

impl<T> Item for T
where
  T: Any + Debug + DynClone + Send + Sync + 'static,
  T: PartialEq,
{
  #[inline]
  fn as_any(&self) -> &(dyn Any + Send + Sync) {
    self
  }

  #[inline]
  fn dyn_eq(&self, other: &dyn Any) -> bool {
    other
      .downcast_ref::<T>()
      .map_or(false, |other| PartialEq::eq(self, other))
  }
}
