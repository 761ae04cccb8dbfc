//! Error types for the process supervision core.
//!
//! Two families of errors exist:
//!
//! - [`ProcError`]: Returned by operations on a [`Pid`] when the target
//!   cannot be reached (nil handle or terminated process).
//! - [`Exception`]: Returned when bootstrapping the runtime fails.
//!
//! Process termination itself is never an error value of this module; it is
//! expressed as an [`Exit`] reason.
//!
//! [`Pid`]: crate::core::Pid
//! [`Exit`]: crate::core::Exit

mod exception;
mod exception_class;
mod exception_group;
mod proc_error;

pub use self::exception::Exception;
pub use self::exception_class::ExceptionClass;
pub use self::exception_group::ExceptionGroup;
pub use self::proc_error::ProcError;
