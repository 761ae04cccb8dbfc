//! Utility types and functions used throughout the crate.
//!
//! # Contents
//!
//! - [`CatchUnwind`]: Future wrapper for catching panics
//! - [`measure_fn`]: Execution timing
//! - [`take_panic_trace`]: Backtrace of the latest panic on this thread

mod catch_unwind;
mod measure;
mod panic_trace;

pub(crate) use self::catch_unwind::CatchUnwind;
pub(crate) use self::measure::measure_fn;
pub(crate) use self::panic_trace::install_panic_trace;
pub(crate) use self::panic_trace::take_panic_trace;
