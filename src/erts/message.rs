use crate::core::Exit;
use crate::core::Pid;
use crate::core::Ref;
use crate::core::Term;

// -----------------------------------------------------------------------------
// Message
// -----------------------------------------------------------------------------

/// An informational message delivered to the user-facing message path.
///
/// Besides ordinary [`Term`]s, a process receives trapped exit signals and
/// monitor notifications as data through this type.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
  /// A user message.
  Term(Term),
  /// A trapped exit signal.
  Exit(ExitMessage),
  /// A monitor notification.
  Down(DownMessage),
}

impl Message {
  /// Returns `true` if the message is a term.
  #[inline]
  pub fn is_term(&self) -> bool {
    matches!(self, Self::Term(_))
  }

  /// Returns `true` if the message is a trapped EXIT signal.
  #[inline]
  pub fn is_exit(&self) -> bool {
    matches!(self, Self::Exit(_))
  }

  /// Returns `true` if the message is a DOWN notification.
  #[inline]
  pub fn is_down(&self) -> bool {
    matches!(self, Self::Down(_))
  }
}

impl From<Term> for Message {
  #[inline]
  fn from(other: Term) -> Self {
    Self::Term(other)
  }
}

impl From<ExitMessage> for Message {
  #[inline]
  fn from(other: ExitMessage) -> Self {
    Self::Exit(other)
  }
}

impl From<DownMessage> for Message {
  #[inline]
  fn from(other: DownMessage) -> Self {
    Self::Down(other)
  }
}

// -----------------------------------------------------------------------------
// Exit Message
// -----------------------------------------------------------------------------

/// An EXIT message from a would-be fatal exit signal.
///
/// EXIT messages appear only when the receiving process has the `trap_exit`
/// flag enabled. Without this flag the signal terminates the process instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExitMessage {
  from: Pid,
  exit: Exit,
}

impl ExitMessage {
  #[inline]
  pub(crate) fn new(from: Pid, exit: Exit) -> Self {
    Self { from, exit }
  }

  /// Returns the process that sent the exit signal.
  #[inline]
  pub fn from(&self) -> &Pid {
    &self.from
  }

  /// Returns the exit reason.
  #[inline]
  pub fn exit(&self) -> &Exit {
    &self.exit
  }
}

// -----------------------------------------------------------------------------
// Down Message
// -----------------------------------------------------------------------------

/// A DOWN notification for a monitored process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownMessage {
  mref: Ref,
  item: Pid,
  info: Exit,
}

impl DownMessage {
  #[inline]
  pub(crate) fn new(mref: Ref, item: Pid, info: Exit) -> Self {
    Self { mref, item, info }
  }

  /// Returns the monitor reference.
  #[inline]
  pub fn mref(&self) -> Ref {
    self.mref
  }

  /// Returns the monitored process.
  #[inline]
  pub fn item(&self) -> &Pid {
    &self.item
  }

  /// Returns the exit reason of the monitored process.
  #[inline]
  pub fn info(&self) -> &Exit {
    &self.info
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::Exit;
  use crate::core::Pid;
  use crate::core::Ref;
  use crate::core::Term;
  use crate::erts::DownMessage;
  use crate::erts::ExitMessage;
  use crate::erts::Message;

  #[test]
  fn test_kind_predicates() {
    let term: Message = Message::from(Term::new(1_i32));
    let exit: Message = Message::from(ExitMessage::new(Pid::NIL, Exit::NORMAL));
    let down: Message = Message::from(DownMessage::new(Ref::new(1, 1), Pid::NIL, Exit::NOPROC));

    assert!(term.is_term() && !term.is_exit() && !term.is_down());
    assert!(!exit.is_term() && exit.is_exit() && !exit.is_down());
    assert!(!down.is_term() && !down.is_exit() && down.is_down());
  }

  #[test]
  fn test_accessors() {
    let exit: ExitMessage = ExitMessage::new(Pid::NIL, Exit::from("boom"));
    let down: DownMessage = DownMessage::new(Ref::new(1, 7), Pid::NIL, Exit::NOPROC);

    assert!(exit.from().is_nil());
    assert_eq!(exit.exit(), &Exit::from("boom"));
    assert_eq!(down.mref(), Ref::new(1, 7));
    assert!(down.item().is_nil());
    assert!(down.info().is_noproc());
  }
}
