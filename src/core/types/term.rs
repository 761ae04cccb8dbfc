//! Type-erased payload carried on the user channel of a process.
//!
//! Payload encoding is outside the scope of the supervision core; a [`Term`]
//! is simply any cloneable, comparable, thread-safe value that can be
//! recovered by downcasting.

use dyn_clone::clone_box;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::core::Item;

/// Dynamically typed value that can be sent between processes.
///
/// # Examples
///
/// ```
/// use procsys::core::Term;
///
/// let num = Term::new(42_i32);
///
/// assert!(num.is::<i32>());
/// assert_eq!(num.downcast_ref::<i32>(), Some(&42));
/// assert_eq!(num.downcast_ref::<String>(), None);
/// ```
#[repr(transparent)]
pub struct Term {
  data: Box<dyn Item>,
}

impl Term {
  /// Creates a new term wrapping the given value.
  #[inline]
  pub fn new<T>(data: T) -> Self
  where
    T: Item,
  {
    Self {
      data: Box::new(data),
    }
  }

  /// Returns `true` if the contained value is of type `T`.
  #[inline]
  pub fn is<T>(&self) -> bool
  where
    T: 'static,
  {
    self.data.as_any().is::<T>()
  }

  /// Returns a shared reference to the contained value of type `T`.
  ///
  /// Returns [`None`] if the value has a different concrete type.
  #[inline]
  pub fn downcast_ref<T>(&self) -> Option<&T>
  where
    T: 'static,
  {
    self.data.as_any().downcast_ref()
  }

  /// Extracts the contained value of type `T`.
  ///
  /// Returns the original term if the value has a different concrete type.
  pub fn downcast<T>(self) -> std::result::Result<Box<T>, Self>
  where
    T: 'static,
  {
    if self.is::<T>() {
      // SAFETY: `Term::is` ensures the contained value is of type `T`.
      Ok(unsafe { Box::from_raw(Box::into_raw(self.data).cast::<T>()) })
    } else {
      Err(self)
    }
  }
}

impl Clone for Term {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      data: clone_box(&*self.data),
    }
  }
}

impl PartialEq for Term {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    *self.data == *other.data
  }
}

impl Debug for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&*self.data, f)
  }
}

impl Display for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&*self.data, f)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
