use hashbrown::HashMap;
use std::collections::VecDeque;

use crate::consts::CAP_PROC_LINKS;
use crate::core::Pid;
use crate::core::Ref;
use crate::erts::EnvRef;
use crate::erts::Signal;
use crate::proc::ProcMail;
use crate::proc::ProcessFlags;

// -----------------------------------------------------------------------------
// Proc Read-only
// -----------------------------------------------------------------------------

/// Immutable process data, set once at process creation.
#[derive(Debug)]
pub(crate) struct ProcReadOnly {
  /// Identity of the process.
  pub(crate) pid: Pid,
  /// Environment that allocated the process.
  pub(crate) env: EnvRef,
}

impl ProcReadOnly {
  #[inline]
  pub(crate) const fn new(pid: Pid, env: EnvRef) -> Self {
    Self { pid, env }
  }
}

// -----------------------------------------------------------------------------
// Proc Internal
// -----------------------------------------------------------------------------

/// Mutable process state.
///
/// Only the owning process task touches this state, so it carries no lock.
///
/// # Fields
///
/// - `flags`: Process behavior flags
/// - `links`: Linked peers, in insertion order until a removal
/// - `monitors_by_me`: Processes this process is watching
/// - `monitors`: Processes watching this process
/// - `inbox`: Informational messages delivered to self
/// - `pending`: Control signals delivered to self
#[derive(Debug)]
pub(crate) struct ProcInternal {
  /// Process flags.
  pub(crate) flags: ProcessFlags,
  /// Linked processes.
  pub(crate) links: Vec<Pid>,
  /// Monitors requested by this process.
  pub(crate) monitors_by_me: HashMap<Ref, Pid>,
  /// Monitors watching this process.
  pub(crate) monitors: HashMap<Ref, Pid>,
  /// Local message queue.
  pub(crate) inbox: ProcMail,
  /// Local signal queue.
  pub(crate) pending: VecDeque<Signal>,
}

impl ProcInternal {
  #[inline]
  pub(crate) fn new() -> Self {
    Self {
      flags: ProcessFlags::empty(),
      links: Vec::with_capacity(CAP_PROC_LINKS),
      monitors_by_me: HashMap::new(),
      monitors: HashMap::new(),
      inbox: ProcMail::new(),
      pending: VecDeque::new(),
    }
  }

  /// Adds `peer` to the link set of `this`.
  ///
  /// Returns `false` if `peer` is nil, equals `this`, or is already linked.
  pub(crate) fn link(&mut self, this: &Pid, peer: &Pid) -> bool {
    if peer.is_nil() || peer == this || self.links.contains(peer) {
      return false;
    }

    self.links.push(peer.clone());

    true
  }

  /// Removes `peer` from the link set.
  ///
  /// Returns `false` if `peer` was not linked.
  pub(crate) fn unlink(&mut self, peer: &Pid) -> bool {
    if peer.is_nil() || self.links.is_empty() {
      return false;
    }

    match self.links.iter().position(|link| link == peer) {
      Some(index) => {
        self.links.swap_remove(index);
        true
      }
      None => false,
    }
  }

  /// Returns a snapshot of the current links.
  #[inline]
  pub(crate) fn links(&self) -> Vec<Pid> {
    self.links.clone()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use crate::core::Pid;
  use crate::erts::Env;
  use crate::erts::EnvConfig;
  use crate::proc::ProcInternal;
  use crate::proc::ProcRecv;

  fn pids(count: usize) -> (Vec<Pid>, Vec<ProcRecv>) {
    let env: Arc<Env> = Env::new(EnvConfig::default());

    (0..count).map(|_| env.make_pid()).unzip()
  }

  #[test]
  fn test_link_idempotent() {
    let (pids, _recv): (Vec<Pid>, Vec<ProcRecv>) = pids(2);
    let mut internal: ProcInternal = ProcInternal::new();

    assert!(internal.link(&pids[0], &pids[1]));
    assert!(!internal.link(&pids[0], &pids[1]));
    assert_eq!(internal.links(), vec![pids[1].clone()]);
  }

  #[test]
  fn test_link_self_and_nil() {
    let (pids, _recv): (Vec<Pid>, Vec<ProcRecv>) = pids(1);
    let mut internal: ProcInternal = ProcInternal::new();

    assert!(!internal.link(&pids[0], &pids[0]));
    assert!(!internal.link(&pids[0], &Pid::NIL));
    assert!(internal.links().is_empty());
  }

  #[test]
  fn test_unlink() {
    let (pids, _recv): (Vec<Pid>, Vec<ProcRecv>) = pids(4);
    let mut internal: ProcInternal = ProcInternal::new();

    assert!(!internal.unlink(&pids[1]));

    for peer in &pids[1..] {
      assert!(internal.link(&pids[0], peer));
    }

    assert!(internal.unlink(&pids[1]));
    assert!(!internal.unlink(&pids[1]));
    assert!(!internal.unlink(&Pid::NIL));

    let mut links: Vec<Pid> = internal.links();
    links.sort_by_key(Pid::id);

    assert_eq!(links, vec![pids[2].clone(), pids[3].clone()]);
  }
}
