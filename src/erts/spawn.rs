use std::sync::Arc;
use tokio::task::JoinError;
use tokio::task::JoinHandle;

use crate::consts;
use crate::core::Exit;
use crate::core::Pid;
use crate::erts::Tracer;

// -----------------------------------------------------------------------------
// Spawn Config
// -----------------------------------------------------------------------------

/// Options used to configure a spawned process.
#[derive(Clone, Debug)]
pub struct SpawnConfig {
  /// Creates a link to the given process before the body starts.
  ///
  /// [`Pid::NIL`] means "no parent".
  pub link: Pid,
  /// Sets the [`TRAP_EXIT`] process flag of the spawned process.
  ///
  /// [`TRAP_EXIT`]: crate::proc::ProcessFlags::TRAP_EXIT
  pub trap_exit: bool,
  /// Installs a tracer around control signal dispatch.
  pub tracer: Option<Arc<dyn Tracer>>,
}

impl SpawnConfig {
  #[inline]
  pub const fn new() -> Self {
    Self {
      link: Pid::NIL,
      trap_exit: consts::SPAWN_INIT_TRAP_EXIT,
      tracer: None,
    }
  }

  #[inline]
  pub fn new_link(parent: Pid) -> Self {
    let mut this: Self = Self::new();
    this.link = parent;
    this
  }
}

impl Default for SpawnConfig {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Spawn Handle
// -----------------------------------------------------------------------------

/// A handle to a spawned process.
#[derive(Debug)]
pub struct SpawnHandle {
  pid: Pid,
  task: JoinHandle<Exit>,
}

impl SpawnHandle {
  #[inline]
  pub(crate) fn new(pid: Pid, task: JoinHandle<Exit>) -> Self {
    Self { pid, task }
  }

  /// Returns the identity of the spawned process.
  #[inline]
  pub fn pid(&self) -> &Pid {
    &self.pid
  }

  /// Waits for the process to terminate and returns its exit reason.
  pub async fn join(self) -> Exit {
    match self.task.await {
      Ok(exit) => exit,
      Err(error) => join_error(error),
    }
  }
}

#[cold]
fn join_error(error: JoinError) -> Exit {
  if error.is_cancelled() {
    Exit::KILLED
  } else {
    Exit::from(error.to_string())
  }
}
