//! The process behavior core.
//!
//! A process is a [`GenProc`] driven by its own tokio task. Its state is split
//! in two sections:
//!
//! - [`ProcReadOnly`]: Identity and environment, fixed at creation
//! - [`ProcInternal`]: Links, monitors, flags, and local queues
//!
//! Neither section is shared with other tasks. Other processes reach a
//! process only through the channels behind its [`Pid`], and every change
//! they cause goes through [`GenProc::handle_sys_msg`].
//!
//! # Signal Queue
//!
//! The system and user channels are bounded tokio MPSC channels; their
//! receiving halves live in [`ProcRecv`]. Messages a process addresses to
//! itself bypass the channels and land in [`ProcMail`] or in the pending
//! signal queue, so a process never blocks on its own buffer.
//!
//! [`Pid`]: crate::core::Pid

mod flags;
mod gen_proc;
mod lifecycle;
mod proc_data;
mod sig_queue;

pub(crate) use self::proc_data::ProcInternal;
pub(crate) use self::proc_data::ProcReadOnly;
pub(crate) use self::sig_queue::ProcEvent;
pub(crate) use self::sig_queue::ProcMail;
pub(crate) use self::sig_queue::ProcRecv;
pub(crate) use self::sig_queue::channel;

pub use self::flags::ProcState;
pub use self::flags::ProcessFlags;
pub use self::gen_proc::BoxFuture;
pub use self::gen_proc::GenProc;
pub use self::gen_proc::GenProcFn;
