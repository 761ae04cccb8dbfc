//! Fundamental runtime types including PIDs, references, terms, and exit reasons.
//!
//! # Type Categories
//!
//! ## Process Identification
//!
//! - [`Pid`]: Process identity handle with channel access
//! - [`Ref`]: Unique reference produced by an environment
//!
//! ## Values and Exit Reasons
//!
//! - [`Term`]: Type-erased runtime value
//! - [`Item`]: Trait for values stored in [`Term`]
//! - [`Exit`]: Process termination reason

mod exit;
mod item;
mod pid;
mod refs;
mod term;

pub use self::exit::Exit;
pub use self::item::Item;
pub use self::pid::Pid;
pub use self::refs::Ref;
pub use self::term::Term;
