use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::consts::TRACE_LABEL_SYS_MSG;
use crate::core::Exit;
use crate::core::Pid;
use crate::core::Ref;
use crate::core::Term;
use crate::erts::DownMessage;
use crate::erts::EnvRef;
use crate::erts::Message;
use crate::erts::Signal;
use crate::erts::SignalDemonitor;
use crate::erts::SignalExit;
use crate::erts::SignalLink;
use crate::erts::SignalMonitor;
use crate::erts::SignalRecv;
use crate::erts::SignalUnlink;
use crate::erts::SpawnConfig;
use crate::erts::Tracer;
use crate::proc::ProcEvent;
use crate::proc::ProcInternal;
use crate::proc::ProcReadOnly;
use crate::proc::ProcRecv;
use crate::proc::ProcState;
use crate::proc::ProcessFlags;
use crate::utils::measure_fn;

/// An owned, sendable, type-erased future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// -----------------------------------------------------------------------------
// Gen Proc Fn
// -----------------------------------------------------------------------------

/// The body of a process.
///
/// Invoked exactly once with the process handle and the start arguments.
/// Returning `Err` terminates the process with that reason.
pub trait GenProcFn: Send + 'static {
  fn call<'a>(self: Box<Self>, process: &'a mut GenProc, args: Vec<Term>) -> BoxFuture<'a, Result<(), Exit>>;
}

impl<F> GenProcFn for F
where
  F: for<'a> FnOnce(&'a mut GenProc, Vec<Term>) -> BoxFuture<'a, Result<(), Exit>>,
  F: Send + 'static,
{
  #[inline]
  fn call<'a>(self: Box<Self>, process: &'a mut GenProc, args: Vec<Term>) -> BoxFuture<'a, Result<(), Exit>> {
    (*self)(process, args)
  }
}

// -----------------------------------------------------------------------------
// Gen Proc
// -----------------------------------------------------------------------------

/// The behavior core of a single process.
///
/// A `GenProc` owns the link set, both monitor maps, and the process flags.
/// It is only ever driven by its own task: control signals are consumed one
/// at a time by [`handle_sys_msg`], which is the only place this state
/// changes in response to other processes.
///
/// [`handle_sys_msg`]: GenProc::handle_sys_msg
pub struct GenProc {
  pub(crate) readonly: ProcReadOnly,
  pub(crate) internal: ProcInternal,
  pub(crate) mailbox: ProcRecv,
  pub(crate) tracer: Option<Arc<dyn Tracer>>,
  pub(crate) state: ProcState,
  pub(crate) body: Option<Box<dyn GenProcFn>>,
}

impl GenProc {
  pub(crate) fn new<F>(pid: Pid, env: EnvRef, mailbox: ProcRecv, config: &SpawnConfig, body: F) -> Self
  where
    F: GenProcFn,
  {
    let mut internal: ProcInternal = ProcInternal::new();

    internal.flags.set(ProcessFlags::TRAP_EXIT, config.trap_exit);

    Self {
      readonly: ProcReadOnly::new(pid, env),
      internal,
      mailbox,
      tracer: config.tracer.clone(),
      state: ProcState::Starting,
      body: Some(Box::new(body)),
    }
  }

  // ---------------------------------------------------------------------------
  // Accessors
  // ---------------------------------------------------------------------------

  /// Returns the identity of this process.
  #[inline]
  pub fn this(&self) -> &Pid {
    &self.readonly.pid
  }

  /// Returns the environment that allocated this process.
  #[inline]
  pub fn env(&self) -> &EnvRef {
    &self.readonly.env
  }

  /// Returns the current process flags.
  #[inline]
  pub fn flags(&self) -> ProcessFlags {
    self.internal.flags
  }

  /// Returns `true` if exit signals are converted into messages.
  #[inline]
  pub fn trap_exit(&self) -> bool {
    self.internal.flags.contains(ProcessFlags::TRAP_EXIT)
  }

  /// Sets the `trap_exit` flag, returning the previous value.
  #[inline]
  pub fn set_trap_exit(&mut self, value: bool) -> bool {
    let prev: bool = self.trap_exit();
    self.internal.flags.set(ProcessFlags::TRAP_EXIT, value);
    prev
  }

  /// Returns the installed tracer.
  #[inline]
  pub fn tracer(&self) -> Option<&Arc<dyn Tracer>> {
    self.tracer.as_ref()
  }

  /// Installs or removes the tracer.
  #[inline]
  pub fn set_tracer(&mut self, tracer: Option<Arc<dyn Tracer>>) {
    self.tracer = tracer;
  }

  /// Returns the lifecycle state.
  ///
  /// Always [`ProcState::Running`] while the body executes.
  #[inline]
  pub fn state(&self) -> ProcState {
    self.state
  }

  /// Returns a snapshot of the current links.
  #[inline]
  pub fn links(&self) -> Vec<Pid> {
    self.internal.links()
  }

  // ---------------------------------------------------------------------------
  // Links
  // ---------------------------------------------------------------------------

  /// Links this process with `peer`.
  ///
  /// Linking with nil, with self, or with an existing link does nothing. If
  /// `peer` has already terminated, the link is dropped at once and this
  /// process receives an exit signal with reason `noproc` from `peer`.
  pub async fn link(&mut self, peer: &Pid) {
    if !self.internal.link(&self.readonly.pid, peer) {
      return;
    }

    let signal: SignalLink = SignalLink::new(self.readonly.pid.clone());

    if let Err(error) = peer.send_sys(signal).await {
      tracing::trace!(pid = %self.readonly.pid, peer = %peer, %error, "link failed");

      self.internal.unlink(peer);
      self
        .internal
        .pending
        .push_back(SignalExit::new(peer.clone(), Exit::from(error)).into());
    }
  }

  /// Removes the link with `peer`.
  ///
  /// The peer is asked to drop its half; failure to reach it is ignored.
  pub async fn unlink(&mut self, peer: &Pid) {
    if !self.internal.unlink(peer) {
      return;
    }

    let _ignore: Result<_, _> = peer.send_sys(SignalUnlink::new(self.readonly.pid.clone())).await;
  }

  // ---------------------------------------------------------------------------
  // Monitors
  // ---------------------------------------------------------------------------

  /// Starts watching `peer`, returning the monitor reference.
  ///
  /// If `peer` cannot be reached, a DOWN message with reason `noproc` is
  /// delivered to this process instead.
  pub async fn monitor(&mut self, peer: &Pid) -> Ref {
    let mref: Ref = self.readonly.env.make_ref();
    let signal: SignalMonitor = SignalMonitor::new(mref, self.readonly.pid.clone());

    if peer == &self.readonly.pid {
      self.internal.pending.push_back(signal.into());
      self.internal.monitors_by_me.insert(mref, peer.clone());
      return mref;
    }

    match peer.send_sys(signal).await {
      Ok(()) => {
        self.internal.monitors_by_me.insert(mref, peer.clone());
      }
      Err(error) => {
        tracing::trace!(pid = %self.readonly.pid, peer = %peer, %error, "monitor failed");

        self
          .internal
          .inbox
          .push(DownMessage::new(mref, peer.clone(), Exit::from(error)).into());
      }
    }

    mref
  }

  /// Stops watching the process associated with `mref`.
  ///
  /// Returns `false` if the reference was unknown.
  pub async fn demonitor(&mut self, mref: Ref) -> bool {
    let Some(peer) = self.internal.monitors_by_me.remove(&mref) else {
      return false;
    };

    if peer == self.readonly.pid {
      self.internal.pending.push_back(SignalDemonitor::new(mref).into());
    } else {
      let _ignore: Result<_, _> = peer.send_sys(SignalDemonitor::new(mref)).await;
    }

    true
  }

  // ---------------------------------------------------------------------------
  // Dispatch
  // ---------------------------------------------------------------------------

  /// Handles a single control signal.
  ///
  /// Returns `Err` with the exit reason if the signal is fatal.
  pub fn handle_sys_msg(&mut self, signal: Signal) -> Result<(), Exit> {
    let Some(tracer) = self.tracer.clone() else {
      return signal.recv(&self.readonly, &mut self.internal);
    };

    let payload: Payload = Payload(format!("{signal:?}"));

    tracer.trace_call(&self.readonly.pid, TRACE_LABEL_SYS_MSG, &payload);

    let (result, elapsed): (Result<(), Exit>, Duration) =
      measure_fn(|| signal.recv(&self.readonly, &mut self.internal));

    tracer.trace_result(&self.readonly.pid, TRACE_LABEL_SYS_MSG, &payload, elapsed, &result);

    result
  }

  // ---------------------------------------------------------------------------
  // Receive
  // ---------------------------------------------------------------------------

  /// Waits for the next informational message.
  ///
  /// Control signals arriving in the meantime are dispatched; a fatal signal
  /// is returned as `Err` so it can be propagated with `?`.
  pub async fn receive(&mut self) -> Result<Message, Exit> {
    loop {
      if let Some(signal) = self.internal.pending.pop_front() {
        self.handle_sys_msg(signal)?;
        continue;
      }

      if let Some(message) = self.internal.inbox.pop() {
        return Ok(message);
      }

      match self.mailbox.recv().await {
        ProcEvent::Sys(signal) => self.handle_sys_msg(signal)?,
        ProcEvent::Usr(message) => return Ok(message),
        ProcEvent::Closed => return Err(Exit::NOPROC),
      }
    }
  }

  /// Like [`receive`], but gives up after `timeout`.
  ///
  /// [`receive`]: GenProc::receive
  pub async fn receive_timeout(&mut self, timeout: Duration) -> Result<Option<Message>, Exit> {
    match tokio::time::timeout(timeout, self.receive()).await {
      Ok(result) => result.map(Some),
      Err(_) => Ok(None),
    }
  }
}

impl Debug for GenProc {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("GenProc")
      .field("pid", &self.readonly.pid)
      .field("state", &self.state)
      .field("flags", &self.internal.flags)
      .field("links", &self.internal.links)
      .field("inbox", &self.internal.inbox.len())
      .finish_non_exhaustive()
  }
}

/// Pre-rendered tracer payload.
struct Payload(String);

impl Debug for Payload {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str(&self.0)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
