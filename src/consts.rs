use std::time::Duration;

// -----------------------------------------------------------------------------
// System - Channels
// -----------------------------------------------------------------------------

/// Default capacity of a process system (control signal) channel.
pub const DEFAULT_SYS_CHANNEL_CAP: usize = 64;

/// Default capacity of a process user (informational message) channel.
pub const DEFAULT_USR_CHANNEL_CAP: usize = 256;

// -----------------------------------------------------------------------------
// System - Process Behavior
// -----------------------------------------------------------------------------

/// Whether the [`TRAP_EXIT`] flag is set by default.
///
/// [`TRAP_EXIT`]: crate::proc::ProcessFlags::TRAP_EXIT
pub const SPAWN_INIT_TRAP_EXIT: bool = false;

// -----------------------------------------------------------------------------
// System - Scheduler Behavior
// -----------------------------------------------------------------------------

/// Default amount of parallelism the tokio runtime should use.
///
/// Note: This value is only used when a default value is not
///       retrievable from the host environment.
pub const DEFAULT_PARALLELISM: usize = 1;

/// Number of scheduler ticks after which the scheduler polls for external events.
pub const DEFAULT_EVENT_INTERVAL: u32 = 61;

/// Number of scheduler ticks after which the scheduler polls the global task queue.
pub const DEFAULT_GLOBAL_QUEUE_INTERVAL: u32 = 31;

/// Limit for additional threads spawned by the tokio runtime.
pub const DEFAULT_MAX_BLOCKING_THREADS: usize = 512;

/// How long to keep threads in the blocking pool alive.
pub const DEFAULT_THREAD_KEEP_ALIVE: Duration = Duration::from_millis(10 * 1000);

/// Stack size (in bytes) for worker threads.
pub const DEFAULT_THREAD_STACK_SIZE: usize = 2 * 1024 * 1024;

// -----------------------------------------------------------------------------
// System - Shutdown
// -----------------------------------------------------------------------------

/// How long to wait for a clean shutdown of the internal runtime.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

// -----------------------------------------------------------------------------
// System - Memory Allocation
// -----------------------------------------------------------------------------

/// Number of pre-allocated slots in the local message buffers.
pub const CAP_PROC_MSG_BUFFER: usize = 8;

/// Number of pre-allocated link slots.
pub const CAP_PROC_LINKS: usize = 4;

// -----------------------------------------------------------------------------
// System - Tracing
// -----------------------------------------------------------------------------

/// Tracer label used around control signal dispatch.
pub const TRACE_LABEL_SYS_MSG: &str = "handle_sys_msg";

/// Tracer label used when the process body has completed.
pub const TRACE_LABEL_RUN_STOP: &str = "run.stop";
