use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

use crate::consts;
use crate::core::Exit;
use crate::core::Pid;
use crate::core::Ref;
use crate::core::Term;
use crate::erts::Message;
use crate::erts::Signal;
use crate::erts::SpawnConfig;
use crate::erts::SpawnHandle;
use crate::loom::sync::atomic::AtomicU64;
use crate::loom::sync::atomic::Ordering;
use crate::proc::BoxFuture;
use crate::proc::GenProc;
use crate::proc::ProcRecv;
use crate::proc::channel;

/// Shared handle to an [`Environment`].
pub type EnvRef = Arc<dyn Environment>;

// -----------------------------------------------------------------------------
// Environment
// -----------------------------------------------------------------------------

/// Allocator of process identities and unique references.
pub trait Environment: Debug + Send + Sync + 'static {
  /// Returns the identity of this environment.
  fn id(&self) -> u64;

  /// Returns a fresh reference, unique within this environment.
  fn make_ref(&self) -> Ref;
}

// -----------------------------------------------------------------------------
// Env Config
// -----------------------------------------------------------------------------

/// Channel capacities used for processes created by an [`Env`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct EnvConfig {
  /// Capacity of the system (control signal) channel.
  pub sys_channel_cap: usize,
  /// Capacity of the user (informational message) channel.
  pub usr_channel_cap: usize,
}

impl EnvConfig {
  #[inline]
  pub const fn new() -> Self {
    Self {
      sys_channel_cap: consts::DEFAULT_SYS_CHANNEL_CAP,
      usr_channel_cap: consts::DEFAULT_USR_CHANNEL_CAP,
    }
  }
}

impl Default for EnvConfig {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Env
// -----------------------------------------------------------------------------

/// The process environment.
///
/// Every `Env` carries a process-wide unique identity, so PIDs and
/// references from different environments never compare equal.
pub struct Env {
  id: u64,
  config: EnvConfig,
  next_pid: AtomicU64,
  next_ref: AtomicU64,
}

impl Env {
  /// Creates a new environment.
  pub fn new(config: EnvConfig) -> Arc<Self> {
    Arc::new(Self {
      id: next_env_id(),
      config,
      next_pid: AtomicU64::new(1),
      next_ref: AtomicU64::new(1),
    })
  }

  /// Returns the configuration of this environment.
  #[inline]
  pub fn config(&self) -> &EnvConfig {
    &self.config
  }

  /// Allocates a new process identity with fresh channels.
  pub(crate) fn make_pid(self: &Arc<Self>) -> (Pid, ProcRecv) {
    let (sys, usr, recv): (Sender<Signal>, Sender<Message>, ProcRecv) =
      channel(self.config.sys_channel_cap, self.config.usr_channel_cap);

    let id: u64 = self.next_pid.fetch_add(1, Ordering::Relaxed);
    let env: EnvRef = Arc::clone(self) as EnvRef;

    (Pid::new(id, env, sys, usr), recv)
  }

  /// Spawns a new process running `body` on its own tokio task.
  ///
  /// Must be called from within a tokio runtime.
  pub fn spawn<F>(self: &Arc<Self>, body: F, config: SpawnConfig, args: Vec<Term>) -> SpawnHandle
  where
    F: for<'a> FnOnce(&'a mut GenProc, Vec<Term>) -> BoxFuture<'a, Result<(), Exit>>,
    F: Send + 'static,
  {
    let (pid, recv): (Pid, ProcRecv) = self.make_pid();
    let parent: Pid = config.link.clone();
    let env: EnvRef = Arc::clone(self) as EnvRef;
    let process: GenProc = GenProc::new(pid.clone(), env, recv, &config, body);

    tracing::debug!(pid = %pid, parent = %parent, "spawn");

    let task: JoinHandle<Exit> = tokio::spawn(process.run(parent, args));

    SpawnHandle::new(pid, task)
  }
}

impl Environment for Env {
  #[inline]
  fn id(&self) -> u64 {
    self.id
  }

  #[inline]
  fn make_ref(&self) -> Ref {
    Ref::new(self.id, self.next_ref.fetch_add(1, Ordering::Relaxed))
  }
}

impl Debug for Env {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("Env")
      .field("id", &self.id)
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

/// Returns the next process-wide environment identifier.
#[inline]
fn next_env_id() -> u64 {
  static ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
  ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use hashbrown::HashSet;
  use std::sync::Arc;

  use crate::core::Pid;
  use crate::core::Ref;
  use crate::erts::Env;
  use crate::erts::EnvConfig;
  use crate::erts::Environment;
  use crate::proc::ProcRecv;

  #[test]
  fn test_unique_env_ids() {
    let a: Arc<Env> = Env::new(EnvConfig::default());
    let b: Arc<Env> = Env::new(EnvConfig::default());

    assert_ne!(a.id(), b.id());
  }

  #[test]
  fn test_make_ref_unique() {
    let env: Arc<Env> = Env::new(EnvConfig::default());
    let mut set: HashSet<Ref> = HashSet::new();

    for _ in 0..100 {
      assert!(set.insert(env.make_ref()));
    }

    assert!(set.iter().all(|mref| mref.env() == env.id()));
  }

  #[test]
  fn test_make_pid_unique() {
    let env: Arc<Env> = Env::new(EnvConfig::default());

    let (a, _recv_a): (Pid, ProcRecv) = env.make_pid();
    let (b, _recv_b): (Pid, ProcRecv) = env.make_pid();

    assert_ne!(a, b);
    assert_ne!(a.id(), 0);
    assert_eq!(a.env().map(|env| env.id()), Some(env.id()));
  }

  #[test]
  fn test_config() {
    let config: EnvConfig = EnvConfig {
      sys_channel_cap: 4,
      usr_channel_cap: 2,
    };

    let env: Arc<Env> = Env::new(config);
    let (pid, _recv): (Pid, ProcRecv) = env.make_pid();

    assert_eq!(env.config(), &config);
    assert_eq!(pid.sys_channel().map(|chan| chan.max_capacity()), Some(4));
    assert_eq!(pid.usr_channel().map(|chan| chan.max_capacity()), Some(2));
  }
}
