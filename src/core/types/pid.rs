use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::hash::Hash;
use std::hash::Hasher;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use triomphe::Arc;

use crate::core::Exit;
use crate::core::Term;
use crate::erts::EnvRef;
use crate::erts::Message;
use crate::erts::Signal;
use crate::erts::SignalExit;
use crate::erts::SignalLinks;
use crate::erts::SignalStop;
use crate::error::ProcError;

/// Identity handle of a process.
///
/// A `Pid` couples the numeric identity of a process with the sending halves
/// of its two channels and its termination gate:
///
/// - **System channel**: bounded, carries control [`Signal`]s
/// - **User channel**: bounded, carries informational [`Message`]s
/// - **Termination gate**: fired exactly once when the process terminates
///
/// Handles are created once by the [`Env`] and are immutable afterwards;
/// cloning a handle shares the same identity.
///
/// # Null Handle
///
/// [`Pid::NIL`] is a valid, distinct value used as a "no parent" sentinel.
/// It compares equal only to itself and renders as `<nil>`.
///
/// # Format
///
/// PIDs display as `<0.Env.Id>`.
///
/// [`Env`]: crate::erts::Env
#[derive(Clone)]
#[repr(transparent)]
pub struct Pid {
  inner: Option<Arc<PidData>>,
}

struct PidData {
  id: u64,
  env: EnvRef,
  sys: Sender<Signal>,
  usr: Sender<Message>,
  exit: CancellationToken,
}

impl Pid {
  /// The null process handle.
  pub const NIL: Self = Self { inner: None };

  /// Creates a new live process handle.
  #[inline]
  pub(crate) fn new(id: u64, env: EnvRef, sys: Sender<Signal>, usr: Sender<Message>) -> Self {
    let data: PidData = PidData {
      id,
      env,
      sys,
      usr,
      exit: CancellationToken::new(),
    };

    Self {
      inner: Some(Arc::new(data)),
    }
  }

  /// Returns the numeric process identifier (`0` for the null handle).
  #[inline]
  pub fn id(&self) -> u64 {
    self.inner.as_ref().map_or(0, |data| data.id)
  }

  /// Returns `true` if this is the null handle.
  #[inline]
  pub fn is_nil(&self) -> bool {
    self.inner.is_none()
  }

  /// Returns the environment that owns this process.
  #[inline]
  pub fn env(&self) -> Option<&EnvRef> {
    self.inner.as_ref().map(|data| &data.env)
  }

  #[inline]
  fn env_id(&self) -> u64 {
    self.inner.as_ref().map_or(0, |data| data.env.id())
  }

  #[inline]
  fn data(&self) -> Result<&PidData, ProcError> {
    self.inner.as_deref().ok_or(ProcError::NilPid)
  }

  // ---------------------------------------------------------------------------
  // Liveness
  // ---------------------------------------------------------------------------

  /// Checks whether the process is alive.
  ///
  /// Returns [`ProcError::NilPid`] for the null handle and
  /// [`ProcError::NoProc`] once the process has terminated. Never blocks.
  #[inline]
  pub fn alive(&self) -> Result<(), ProcError> {
    if self.data()?.exit.is_cancelled() {
      Err(ProcError::NoProc)
    } else {
      Ok(())
    }
  }

  /// Waits until the process has terminated.
  ///
  /// Resolves immediately for the null handle.
  pub async fn terminated(&self) {
    if let Some(data) = self.inner.as_deref() {
      data.exit.cancelled().await;
    }
  }

  /// Fires the termination gate. Idempotent.
  #[inline]
  pub(crate) fn close(&self) {
    if let Some(data) = self.inner.as_deref() {
      data.exit.cancel();
    }
  }

  // ---------------------------------------------------------------------------
  // Channels
  // ---------------------------------------------------------------------------

  /// Returns the sending half of the system channel.
  #[inline]
  pub fn sys_channel(&self) -> Option<&Sender<Signal>> {
    self.inner.as_ref().map(|data| &data.sys)
  }

  /// Returns the sending half of the user channel.
  #[inline]
  pub fn usr_channel(&self) -> Option<&Sender<Message>> {
    self.inner.as_ref().map(|data| &data.usr)
  }

  /// Sends a control signal to the system channel of this process.
  ///
  /// Suspends while the channel is full.
  pub async fn send_sys<S>(&self, signal: S) -> Result<(), ProcError>
  where
    S: Into<Signal>,
  {
    let data: &PidData = self.data()?;

    deliver(&data.exit, &data.sys, signal.into()).await
  }

  /// Sends a user message to this process.
  ///
  /// Suspends while the channel is full.
  pub async fn send(&self, term: Term) -> Result<(), ProcError> {
    self.send_info(Message::Term(term)).await
  }

  pub(crate) async fn send_info(&self, message: Message) -> Result<(), ProcError> {
    let data: &PidData = self.data()?;

    deliver(&data.exit, &data.usr, message).await
  }

  // ---------------------------------------------------------------------------
  // Requests
  // ---------------------------------------------------------------------------

  /// Sends an exit signal with the given `reason` to this process.
  ///
  /// `from` is the sender; [`Pid::NIL`] marks the signal as originating from
  /// the target's own execution.
  pub async fn exit<E>(&self, from: &Pid, reason: E) -> Result<(), ProcError>
  where
    E: Into<Exit>,
  {
    self.send_sys(SignalExit::new(from.clone(), reason.into())).await
  }

  /// Asks this process to stop with the given `reason`.
  pub async fn stop<E>(&self, reason: E) -> Result<(), ProcError>
  where
    E: Into<Exit>,
  {
    self.send_sys(SignalStop::new(reason.into())).await
  }

  /// Returns the processes currently linked to this process.
  ///
  /// The reply is produced by the target's own task while it dispatches
  /// control signals, so a process must not call this on its own pid: the
  /// request would wait forever. Use [`GenProc::links`] from inside the
  /// process instead.
  ///
  /// [`GenProc::links`]: crate::proc::GenProc::links
  pub async fn process_links(&self) -> Result<Vec<Pid>, ProcError> {
    let (send, recv): (oneshot::Sender<Vec<Pid>>, oneshot::Receiver<Vec<Pid>>) = oneshot::channel();

    self.send_sys(SignalLinks::new(send)).await?;

    recv.await.map_err(|_| ProcError::NoProc)
  }
}

impl PartialEq for Pid {
  fn eq(&self, other: &Self) -> bool {
    match (self.inner.as_deref(), other.inner.as_deref()) {
      (None, None) => true,
      (Some(lhs), Some(rhs)) => lhs.id == rhs.id && lhs.env.id() == rhs.env.id(),
      _ => false,
    }
  }
}

impl Eq for Pid {}

impl Hash for Pid {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id().hash(state);
    self.env_id().hash(state);
  }
}

impl Debug for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self.inner.as_deref() {
      Some(data) => write!(f, "<0.{}.{}>", data.env.id(), data.id),
      None => f.write_str("<nil>"),
    }
  }
}

impl Default for Pid {
  #[inline]
  fn default() -> Self {
    Self::NIL
  }
}

/// Delivers `item` unless the target has already terminated.
async fn deliver<T>(exit: &CancellationToken, chan: &Sender<T>, item: T) -> Result<(), ProcError> {
  if exit.is_cancelled() {
    return Err(ProcError::NoProc);
  }

  tokio::select! {
    biased;
    () = exit.cancelled() => Err(ProcError::NoProc),
    result = chan.send(item) => result.map_err(|_| ProcError::NoProc),
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use hashbrown::HashSet;
  use std::sync::Arc;

  use crate::core::Pid;
  use crate::core::Term;
  use crate::erts::Env;
  use crate::erts::EnvConfig;
  use crate::erts::Environment;
  use crate::erts::Message;
  use crate::error::ProcError;
  use crate::proc::ProcRecv;

  fn env() -> Arc<Env> {
    Env::new(EnvConfig::default())
  }

  #[test]
  fn test_nil_equality() {
    let env: Arc<Env> = env();
    let (pid, _recv): (Pid, ProcRecv) = env.make_pid();

    assert_eq!(Pid::NIL, Pid::NIL);
    assert_ne!(Pid::NIL, pid);
    assert_ne!(pid, Pid::NIL);
  }

  #[test]
  fn test_nil_display() {
    assert_eq!(format!("{}", Pid::NIL), "<nil>");
    assert_eq!(format!("{:?}", Pid::NIL), "<nil>");
    assert_eq!(Pid::NIL.id(), 0);
    assert!(Pid::NIL.is_nil());
    assert!(Pid::NIL.env().is_none());
  }

  #[test]
  fn test_display() {
    let env: Arc<Env> = env();
    let (pid, _recv): (Pid, ProcRecv) = env.make_pid();

    assert_eq!(format!("{pid}"), format!("<0.{}.{}>", env.id(), pid.id()));
  }

  #[test]
  fn test_clone_equality() {
    let env: Arc<Env> = env();
    let (a, _recv_a): (Pid, ProcRecv) = env.make_pid();
    let (b, _recv_b): (Pid, ProcRecv) = env.make_pid();

    assert_eq!(a, a.clone());
    assert_ne!(a, b);
  }

  #[test]
  fn test_hash() {
    let env: Arc<Env> = env();
    let (a, _recv_a): (Pid, ProcRecv) = env.make_pid();
    let (b, _recv_b): (Pid, ProcRecv) = env.make_pid();

    let mut set: HashSet<Pid> = HashSet::new();

    set.insert(a.clone());
    set.insert(b);
    set.insert(a);
    set.insert(Pid::NIL);

    assert_eq!(set.len(), 3);
  }

  #[test]
  fn test_same_id_different_env() {
    let env1: Arc<Env> = env();
    let env2: Arc<Env> = env();
    let (a, _recv_a): (Pid, ProcRecv) = env1.make_pid();
    let (b, _recv_b): (Pid, ProcRecv) = env2.make_pid();

    assert_eq!(a.id(), b.id());
    assert_ne!(a, b);
  }

  #[test]
  fn test_alive() {
    let env: Arc<Env> = env();
    let (pid, _recv): (Pid, ProcRecv) = env.make_pid();

    assert_eq!(Pid::NIL.alive(), Err(ProcError::NilPid));
    assert_eq!(pid.alive(), Ok(()));

    pid.close();

    for _ in 0..3 {
      assert_eq!(pid.alive(), Err(ProcError::NoProc));
      assert_eq!(pid.clone().alive(), Err(ProcError::NoProc));
    }
  }

  #[tokio::test]
  async fn test_terminated_resolves() {
    let env: Arc<Env> = env();
    let (pid, _recv): (Pid, ProcRecv) = env.make_pid();

    Pid::NIL.terminated().await;

    pid.close();
    pid.terminated().await;
    pid.terminated().await;
  }

  #[tokio::test]
  async fn test_send() {
    let env: Arc<Env> = env();
    let (pid, mut recv): (Pid, ProcRecv) = env.make_pid();

    pid.send(Term::new(7_i32)).await.unwrap();

    match recv.try_recv_usr() {
      Some(Message::Term(term)) => assert_eq!(term.downcast_ref::<i32>(), Some(&7)),
      other => panic!("unexpected message: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_send_nil() {
    assert_eq!(Pid::NIL.send(Term::new(1_u8)).await, Err(ProcError::NilPid));
    assert_eq!(Pid::NIL.stop("shutdown").await, Err(ProcError::NilPid));
  }

  #[tokio::test]
  async fn test_send_terminated() {
    let env: Arc<Env> = env();
    let (pid, _recv): (Pid, ProcRecv) = env.make_pid();

    pid.close();

    assert_eq!(pid.send(Term::new(1_u8)).await, Err(ProcError::NoProc));
    assert_eq!(pid.exit(&Pid::NIL, "reason").await, Err(ProcError::NoProc));
    assert_eq!(pid.process_links().await, Err(ProcError::NoProc));
  }

  #[tokio::test]
  async fn test_send_closed_receiver() {
    let env: Arc<Env> = env();
    let (pid, mut recv): (Pid, ProcRecv) = env.make_pid();

    recv.close();

    assert_eq!(pid.alive(), Ok(()));
    assert_eq!(pid.stop("shutdown").await, Err(ProcError::NoProc));
  }
}
