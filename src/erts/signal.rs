// Signal Handling
//
// # Erlang References
//
// <https://www.erlang.org/doc/system/ref_man_processes#sending-exit-signals>
// <https://www.erlang.org/doc/system/ref_man_processes#receiving-exit-signals>
use hashbrown::hash_map::Entry;
use tokio::sync::oneshot;
use tracing::Span;
use tracing::span;

use crate::core::Exit;
use crate::core::Pid;
use crate::core::Ref;
use crate::erts::DownMessage;
use crate::erts::ExitMessage;
use crate::proc::ProcInternal;
use crate::proc::ProcReadOnly;
use crate::proc::ProcessFlags;

// -----------------------------------------------------------------------------
// Signal Recv
// -----------------------------------------------------------------------------

/// Trait for processing received signals.
///
/// Handlers run to completion without suspending, which makes every dispatch
/// atomic with respect to every other dispatch of the same process.
pub(crate) trait SignalRecv {
  /// Processes this signal in the context of the receiving process.
  ///
  /// Returns `Err` with the exit reason if the signal terminates the process.
  fn recv(self, readonly: &ProcReadOnly, internal: &mut ProcInternal) -> Result<(), Exit>;
}

// -----------------------------------------------------------------------------
// Signal
// -----------------------------------------------------------------------------

/// Control signal delivered through the system channel of a process.
#[derive(Debug)]
pub enum Signal {
  // ---------------------------------------------------------------------------
  // Link Signals
  // ---------------------------------------------------------------------------
  /// Establish a link with the sender.
  Link(SignalLink),
  /// Remove the link with the sender.
  Unlink(SignalUnlink),
  /// Report the current links.
  Links(SignalLinks),
  // ---------------------------------------------------------------------------
  // Termination Signals
  // ---------------------------------------------------------------------------
  /// Exit signal, possibly from a linked process.
  Exit(SignalExit),
  /// Unconditional stop request.
  Stop(SignalStop),
  // ---------------------------------------------------------------------------
  // Monitor Signals
  // ---------------------------------------------------------------------------
  /// Start watching the receiving process.
  Monitor(SignalMonitor),
  /// Stop watching the receiving process.
  Demonitor(SignalDemonitor),
  /// Notification that a watched process terminated.
  MonitorDown(SignalMonitorDown),
}

impl Signal {
  /// Returns the signal kind as a short string.
  #[inline]
  pub const fn kind(&self) -> &'static str {
    match self {
      Self::Link(_) => "link",
      Self::Unlink(_) => "unlink",
      Self::Links(_) => "links",
      Self::Exit(_) => "exit",
      Self::Stop(_) => "stop",
      Self::Monitor(_) => "monitor",
      Self::Demonitor(_) => "demonitor",
      Self::MonitorDown(_) => "monitor down",
    }
  }

  /// Returns the sender, if the signal carries one.
  #[inline]
  pub const fn sender(&self) -> Option<&Pid> {
    match self {
      Self::Link(signal) => Some(&signal.from),
      Self::Unlink(signal) => Some(&signal.from),
      Self::Exit(signal) => Some(&signal.from),
      Self::Monitor(signal) => Some(&signal.from),
      Self::MonitorDown(signal) => Some(&signal.from),
      Self::Links(_) | Self::Stop(_) | Self::Demonitor(_) => None,
    }
  }
}

impl SignalRecv for Signal {
  fn recv(self, readonly: &ProcReadOnly, internal: &mut ProcInternal) -> Result<(), Exit> {
    let span: Span = tracing::trace_span!(
      "Proc Signal",
      pid = %readonly.pid,
      kind = %self.kind(),
    );

    let _enter: span::Entered<'_> = span.enter();

    match self {
      Self::Link(signal) => signal.recv(readonly, internal),
      Self::Unlink(signal) => signal.recv(readonly, internal),
      Self::Links(signal) => signal.recv(readonly, internal),
      Self::Exit(signal) => signal.recv(readonly, internal),
      Self::Stop(signal) => signal.recv(readonly, internal),
      Self::Monitor(signal) => signal.recv(readonly, internal),
      Self::Demonitor(signal) => signal.recv(readonly, internal),
      Self::MonitorDown(signal) => signal.recv(readonly, internal),
    }
  }
}

impl From<SignalLink> for Signal {
  #[inline]
  fn from(other: SignalLink) -> Self {
    Self::Link(other)
  }
}

impl From<SignalUnlink> for Signal {
  #[inline]
  fn from(other: SignalUnlink) -> Self {
    Self::Unlink(other)
  }
}

impl From<SignalLinks> for Signal {
  #[inline]
  fn from(other: SignalLinks) -> Self {
    Self::Links(other)
  }
}

impl From<SignalExit> for Signal {
  #[inline]
  fn from(other: SignalExit) -> Self {
    Self::Exit(other)
  }
}

impl From<SignalStop> for Signal {
  #[inline]
  fn from(other: SignalStop) -> Self {
    Self::Stop(other)
  }
}

impl From<SignalMonitor> for Signal {
  #[inline]
  fn from(other: SignalMonitor) -> Self {
    Self::Monitor(other)
  }
}

impl From<SignalDemonitor> for Signal {
  #[inline]
  fn from(other: SignalDemonitor) -> Self {
    Self::Demonitor(other)
  }
}

impl From<SignalMonitorDown> for Signal {
  #[inline]
  fn from(other: SignalMonitorDown) -> Self {
    Self::MonitorDown(other)
  }
}

// -----------------------------------------------------------------------------
// Signal - Link
// -----------------------------------------------------------------------------

/// Request to establish a bidirectional link with the sender.
#[derive(Clone, Debug)]
pub struct SignalLink {
  from: Pid,
}

impl SignalLink {
  #[inline]
  pub fn new(from: Pid) -> Self {
    Self { from }
  }

  /// Returns the requesting process.
  #[inline]
  pub fn from(&self) -> &Pid {
    &self.from
  }
}

impl SignalRecv for SignalLink {
  /// Performs the local half of the link.
  fn recv(self, readonly: &ProcReadOnly, internal: &mut ProcInternal) -> Result<(), Exit> {
    tracing::trace!(signal = "link", from = %self.from);

    if internal.link(&readonly.pid, &self.from) {
      tracing::trace!(result = "handled", reason = "new link");
    } else {
      tracing::trace!(result = "ignored", reason = "old link");
    }

    Ok(())
  }
}

// -----------------------------------------------------------------------------
// Signal - Unlink
// -----------------------------------------------------------------------------

/// Request to remove the bidirectional link with the sender.
#[derive(Clone, Debug)]
pub struct SignalUnlink {
  from: Pid,
}

impl SignalUnlink {
  #[inline]
  pub fn new(from: Pid) -> Self {
    Self { from }
  }

  /// Returns the requesting process.
  #[inline]
  pub fn from(&self) -> &Pid {
    &self.from
  }
}

impl SignalRecv for SignalUnlink {
  fn recv(self, _readonly: &ProcReadOnly, internal: &mut ProcInternal) -> Result<(), Exit> {
    tracing::trace!(signal = "unlink", from = %self.from);

    if internal.unlink(&self.from) {
      tracing::trace!(result = "handled");
    } else {
      tracing::trace!(result = "ignored", reason = "no link");
    }

    Ok(())
  }
}

// -----------------------------------------------------------------------------
// Signal - Links
// -----------------------------------------------------------------------------

/// Introspection request for the current link set.
#[derive(Debug)]
pub struct SignalLinks {
  reply: oneshot::Sender<Vec<Pid>>,
}

impl SignalLinks {
  #[inline]
  pub fn new(reply: oneshot::Sender<Vec<Pid>>) -> Self {
    Self { reply }
  }
}

impl SignalRecv for SignalLinks {
  fn recv(self, _readonly: &ProcReadOnly, internal: &mut ProcInternal) -> Result<(), Exit> {
    tracing::trace!(signal = "links", count = internal.links.len());

    if self.reply.send(internal.links()).is_ok() {
      tracing::trace!(result = "handled");
    } else {
      tracing::trace!(result = "ignored", reason = "dropped reply");
    }

    Ok(())
  }
}

// -----------------------------------------------------------------------------
// Signal - Exit
// -----------------------------------------------------------------------------

/// Exit signal.
///
/// `from` is [`Pid::NIL`] when the signal originates from the receiving
/// process itself. Link-sourced signals are produced when a linked process
/// terminates.
#[derive(Clone, Debug)]
pub struct SignalExit {
  from: Pid,
  exit: Exit,
  link: bool,
}

impl SignalExit {
  /// Creates a plain exit signal.
  #[inline]
  pub fn new(from: Pid, exit: Exit) -> Self {
    Self {
      from,
      exit,
      link: false,
    }
  }

  /// Creates an exit signal sourced from an established link.
  #[inline]
  pub fn linked(from: Pid, exit: Exit) -> Self {
    Self {
      from,
      exit,
      link: true,
    }
  }

  /// Returns the sending process.
  #[inline]
  pub fn from(&self) -> &Pid {
    &self.from
  }

  /// Returns the exit reason.
  #[inline]
  pub fn exit(&self) -> &Exit {
    &self.exit
  }

  /// Returns `true` if the signal was produced by a link.
  #[inline]
  pub fn is_link(&self) -> bool {
    self.link
  }
}

impl SignalRecv for SignalExit {
  /// Decides between ignoring, trapping, and terminating.
  ///
  /// The checks run in a fixed order:
  ///
  /// 1. Link-sourced signals drop the link; unknown links are ignored
  /// 2. Normal exits from other processes are ignored unless trapping
  /// 3. Non-kill exits from other processes are trapped if `trap_exit` is set
  /// 4. Anything else terminates the process; `kill` becomes `killed`
  fn recv(self, readonly: &ProcReadOnly, internal: &mut ProcInternal) -> Result<(), Exit> {
    tracing::trace!(signal = "exit", from = %self.from, exit = %self.exit, link = self.link);

    if self.link && !internal.unlink(&self.from) {
      tracing::trace!(result = "ignored", reason = "no link");
      return Ok(());
    }

    let external: bool = !self.from.is_nil() && self.from != readonly.pid;
    let trapping: bool = internal.flags.contains(ProcessFlags::TRAP_EXIT);

    if external && !trapping && self.exit.is_normal() {
      tracing::trace!(result = "ignored", reason = "normal");
      return Ok(());
    }

    if external && trapping && !self.exit.is_kill() {
      internal.inbox.push(ExitMessage::new(self.from, self.exit).into());
      tracing::trace!(result = "trapped", reason = "proc flag");
      return Ok(());
    }

    if self.exit.is_kill() {
      tracing::trace!(result = "terminated", reason = "killed");
      Err(Exit::KILLED)
    } else {
      tracing::trace!(result = "terminated", reason = "exit");
      Err(self.exit)
    }
  }
}

// -----------------------------------------------------------------------------
// Signal - Stop
// -----------------------------------------------------------------------------

/// Unconditional stop request.
#[derive(Clone, Debug)]
pub struct SignalStop {
  exit: Exit,
}

impl SignalStop {
  #[inline]
  pub fn new(exit: Exit) -> Self {
    Self { exit }
  }
}

impl SignalRecv for SignalStop {
  fn recv(self, _readonly: &ProcReadOnly, _internal: &mut ProcInternal) -> Result<(), Exit> {
    tracing::trace!(signal = "stop", result = "terminated", exit = %self.exit);
    Err(self.exit)
  }
}

// -----------------------------------------------------------------------------
// Signal - Monitor
// -----------------------------------------------------------------------------

/// Request from `from` to start watching the receiving process.
#[derive(Clone, Debug)]
pub struct SignalMonitor {
  mref: Ref,
  from: Pid,
}

impl SignalMonitor {
  #[inline]
  pub fn new(mref: Ref, from: Pid) -> Self {
    Self { mref, from }
  }

  /// Returns the monitor reference.
  #[inline]
  pub fn mref(&self) -> Ref {
    self.mref
  }

  /// Returns the watching process.
  #[inline]
  pub fn from(&self) -> &Pid {
    &self.from
  }
}

impl SignalRecv for SignalMonitor {
  fn recv(self, _readonly: &ProcReadOnly, internal: &mut ProcInternal) -> Result<(), Exit> {
    tracing::trace!(signal = "monitor", from = %self.from, mref = %self.mref);

    match internal.monitors.entry(self.mref) {
      Entry::Occupied(_) => {
        tracing::trace!(result = "ignored", reason = "old monitor");
      }
      Entry::Vacant(entry) => {
        entry.insert(self.from);
        tracing::trace!(result = "handled", reason = "new monitor");
      }
    }

    Ok(())
  }
}

// -----------------------------------------------------------------------------
// Signal - Demonitor
// -----------------------------------------------------------------------------

/// Request to stop watching the receiving process.
#[derive(Clone, Debug)]
pub struct SignalDemonitor {
  mref: Ref,
}

impl SignalDemonitor {
  #[inline]
  pub fn new(mref: Ref) -> Self {
    Self { mref }
  }

  /// Returns the monitor reference.
  #[inline]
  pub fn mref(&self) -> Ref {
    self.mref
  }
}

impl SignalRecv for SignalDemonitor {
  fn recv(self, _readonly: &ProcReadOnly, internal: &mut ProcInternal) -> Result<(), Exit> {
    tracing::trace!(signal = "demonitor", mref = %self.mref);

    if internal.monitors.remove(&self.mref).is_some() {
      tracing::trace!(result = "handled");
    } else {
      tracing::trace!(result = "ignored", reason = "no monitor");
    }

    Ok(())
  }
}

// -----------------------------------------------------------------------------
// Signal - Monitor Down
// -----------------------------------------------------------------------------

/// Notification that the watched process `from` terminated.
#[derive(Clone, Debug)]
pub struct SignalMonitorDown {
  mref: Ref,
  from: Pid,
  exit: Exit,
}

impl SignalMonitorDown {
  #[inline]
  pub fn new(mref: Ref, from: Pid, exit: Exit) -> Self {
    Self { mref, from, exit }
  }

  /// Returns the monitor reference.
  #[inline]
  pub fn mref(&self) -> Ref {
    self.mref
  }

  /// Returns the watched process.
  #[inline]
  pub fn from(&self) -> &Pid {
    &self.from
  }

  /// Returns the exit reason of the watched process.
  #[inline]
  pub fn exit(&self) -> &Exit {
    &self.exit
  }
}

impl SignalRecv for SignalMonitorDown {
  /// Drops the local monitor entry and forwards the notification as a message.
  fn recv(self, _readonly: &ProcReadOnly, internal: &mut ProcInternal) -> Result<(), Exit> {
    tracing::trace!(signal = "monitor down", from = %self.from, mref = %self.mref, exit = %self.exit);

    if internal.monitors_by_me.remove(&self.mref).is_none() {
      tracing::trace!(reason = "no monitor");
    }

    internal.inbox.push(DownMessage::new(self.mref, self.from, self.exit).into());

    tracing::trace!(result = "enqueue");

    Ok(())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
