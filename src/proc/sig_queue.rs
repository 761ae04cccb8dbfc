use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::Sender;

use crate::consts::CAP_PROC_MSG_BUFFER;
use crate::erts::Message;
use crate::erts::Signal;

/// Creates the bounded system and user channels of a new process.
#[inline]
pub(crate) fn channel(sys_cap: usize, usr_cap: usize) -> (Sender<Signal>, Sender<Message>, ProcRecv) {
  let (sys_send, sys_recv): (Sender<Signal>, Receiver<Signal>) = mpsc::channel(sys_cap.max(1));
  let (usr_send, usr_recv): (Sender<Message>, Receiver<Message>) = mpsc::channel(usr_cap.max(1));

  (sys_send, usr_send, ProcRecv::new(sys_recv, usr_recv))
}

// -----------------------------------------------------------------------------
// Proc Recv
// -----------------------------------------------------------------------------

/// Receiving halves of the process channels, owned by the process task.
#[derive(Debug)]
pub(crate) struct ProcRecv {
  sys: Receiver<Signal>,
  usr: Receiver<Message>,
}

/// An item received from either channel.
#[derive(Debug)]
pub(crate) enum ProcEvent {
  Sys(Signal),
  Usr(Message),
  Closed,
}

impl ProcRecv {
  #[inline]
  const fn new(sys: Receiver<Signal>, usr: Receiver<Message>) -> Self {
    Self { sys, usr }
  }

  /// Closes both channels; queued items remain receivable.
  #[inline]
  pub(crate) fn close(&mut self) {
    self.sys.close();
    self.usr.close();
  }

  #[inline]
  pub(crate) fn try_recv_sys(&mut self) -> Option<Signal> {
    self.sys.try_recv().ok()
  }

  #[cfg(test)]
  #[inline]
  pub(crate) fn try_recv_usr(&mut self) -> Option<Message> {
    self.usr.try_recv().ok()
  }

  /// Waits for the next item, preferring the system channel.
  pub(crate) async fn recv(&mut self) -> ProcEvent {
    tokio::select! {
      biased;
      Some(signal) = self.sys.recv() => ProcEvent::Sys(signal),
      Some(message) = self.usr.recv() => ProcEvent::Usr(message),
      else => ProcEvent::Closed,
    }
  }
}

// -----------------------------------------------------------------------------
// Proc Mail
// -----------------------------------------------------------------------------

/// Local inbox for messages a process delivers to itself.
#[derive(Debug)]
#[repr(transparent)]
pub(crate) struct ProcMail {
  mqueue: VecDeque<Message>,
}

impl ProcMail {
  #[inline]
  pub(crate) fn new() -> Self {
    Self {
      mqueue: VecDeque::with_capacity(CAP_PROC_MSG_BUFFER),
    }
  }

  #[inline]
  pub(crate) fn push(&mut self, message: Message) {
    self.mqueue.push_back(message);
  }

  #[inline]
  pub(crate) fn pop(&mut self) -> Option<Message> {
    self.mqueue.pop_front()
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.mqueue.len()
  }

  #[cfg(test)]
  #[inline]
  pub(crate) fn is_empty(&self) -> bool {
    self.mqueue.is_empty()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use tokio::sync::mpsc::Sender;

  use crate::core::Exit;
  use crate::core::Term;
  use crate::erts::Message;
  use crate::erts::Signal;
  use crate::erts::SignalStop;
  use crate::proc::ProcMail;
  use crate::proc::sig_queue::ProcEvent;
  use crate::proc::sig_queue::channel;

  #[test]
  fn test_mail_fifo() {
    let mut mail: ProcMail = ProcMail::new();

    mail.push(Message::Term(Term::new(1_i32)));
    mail.push(Message::Term(Term::new(2_i32)));

    assert_eq!(mail.len(), 2);
    assert_eq!(mail.pop(), Some(Message::Term(Term::new(1_i32))));
    assert_eq!(mail.pop(), Some(Message::Term(Term::new(2_i32))));
    assert!(mail.is_empty());
  }

  #[tokio::test]
  async fn test_recv_prefers_sys() {
    let (sys, usr, mut recv) = channel(4, 4);

    usr.send(Message::Term(Term::new(1_i32))).await.unwrap();
    sys.send(SignalStop::new(Exit::NORMAL).into()).await.unwrap();

    assert!(matches!(recv.recv().await, ProcEvent::Sys(Signal::Stop(_))));
    assert!(matches!(recv.recv().await, ProcEvent::Usr(Message::Term(_))));
  }

  #[tokio::test]
  async fn test_recv_closed() {
    let (sys, usr, mut recv): (Sender<Signal>, Sender<Message>, _) = channel(1, 1);

    drop(sys);
    drop(usr);

    assert!(matches!(recv.recv().await, ProcEvent::Closed));
  }

  #[tokio::test]
  async fn test_close_keeps_queued() {
    let (sys, _usr, mut recv) = channel(2, 2);

    sys.send(SignalStop::new(Exit::NORMAL).into()).await.unwrap();
    recv.close();

    assert!(sys.send(SignalStop::new(Exit::KILL).into()).await.is_err());
    assert!(matches!(recv.try_recv_sys(), Some(Signal::Stop(_))));
    assert!(recv.try_recv_sys().is_none());
  }
}
