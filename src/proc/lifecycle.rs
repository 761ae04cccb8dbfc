use hashbrown::HashMap;
use std::any::Any;
use std::mem;
use std::panic::AssertUnwindSafe;

use crate::consts::TRACE_LABEL_RUN_STOP;
use crate::core::Exit;
use crate::core::Pid;
use crate::core::Ref;
use crate::core::Term;
use crate::erts::Signal;
use crate::erts::SignalExit;
use crate::erts::SignalMonitorDown;
use crate::proc::GenProc;
use crate::proc::GenProcFn;
use crate::proc::ProcState;
use crate::utils::CatchUnwind;
use crate::utils::install_panic_trace;
use crate::utils::take_panic_trace;

impl GenProc {
  /// Runs the process to completion and returns its exit reason.
  ///
  /// 1. Links to `parent` (unless nil)
  /// 2. Invokes the body exactly once, capturing panics
  /// 3. Notifies every link and every watcher
  /// 4. Answers late link and monitor requests with `noproc`
  /// 5. Fires the termination gate
  pub(crate) async fn run(mut self, parent: Pid, args: Vec<Term>) -> Exit {
    self.link(&parent).await;

    let exit: Exit = match self.body.take() {
      Some(body) => self.invoke(body, args).await,
      None => Exit::NORMAL,
    };

    self.state = ProcState::Stopping;

    tracing::debug!(pid = %self.readonly.pid, state = %self.state, exit = %exit, "stopping");

    if let Some(tracer) = self.tracer.as_deref() {
      tracer.trace_call(&self.readonly.pid, TRACE_LABEL_RUN_STOP, &exit);
    }

    self.on_stop(&exit).await;
    self.flush().await;

    self.readonly.pid.close();
    self.state = ProcState::Terminated;

    tracing::debug!(pid = %self.readonly.pid, state = %self.state, exit = %exit, "terminated");

    exit
  }

  async fn invoke(&mut self, body: Box<dyn GenProcFn>, args: Vec<Term>) -> Exit {
    let pid: Pid = self.readonly.pid.clone();

    self.state = ProcState::Running;

    install_panic_trace();

    let result: Result<Result<(), Exit>, Box<dyn Any + Send>> =
      CatchUnwind::new(AssertUnwindSafe(body.call(self, args))).await;

    match result {
      Ok(Ok(())) => Exit::NORMAL,
      Ok(Err(exit)) => exit,
      Err(payload) => {
        let exit: Exit = Exit::from_panic(&*payload);

        match take_panic_trace() {
          Some(trace) => {
            tracing::error!(pid = %pid, exit = %exit, backtrace = %trace, "crashed");
          }
          None => {
            tracing::error!(pid = %pid, exit = %exit, "crashed");
          }
        }

        exit
      }
    }
  }

  /// Broadcasts `exit` to every link and every watcher, then clears both.
  ///
  /// Both channels are closed first, so a peer trying to reach this process
  /// from now on observes `noproc` instead of blocking on a full buffer.
  async fn on_stop(&mut self, exit: &Exit) {
    self.mailbox.close();

    let this: Pid = self.readonly.pid.clone();
    let links: Vec<Pid> = mem::take(&mut self.internal.links);

    for peer in links {
      let _ignore: Result<_, _> = peer.send_sys(SignalExit::linked(this.clone(), exit.clone())).await;
    }

    let monitors: HashMap<Ref, Pid> = mem::take(&mut self.internal.monitors);

    for (mref, peer) in monitors {
      let _ignore: Result<_, _> = peer
        .send_sys(SignalMonitorDown::new(mref, this.clone(), exit.clone()))
        .await;
    }

    self.internal.monitors_by_me.clear();
  }

  /// Drains control signals that were queued before the channels closed.
  ///
  /// Late link requests receive an exit signal with reason `noproc`; late
  /// monitor requests receive a DOWN notification with reason `noproc`.
  /// Everything else is dropped.
  async fn flush(&mut self) {
    let this: Pid = self.readonly.pid.clone();

    self.internal.pending.clear();

    while let Some(signal) = self.mailbox.try_recv_sys() {
      match signal {
        Signal::Link(signal) => {
          let _ignore: Result<_, _> = signal
            .from()
            .send_sys(SignalExit::linked(this.clone(), Exit::NOPROC))
            .await;
        }
        Signal::Monitor(signal) => {
          let _ignore: Result<_, _> = signal
            .from()
            .send_sys(SignalMonitorDown::new(signal.mref(), this.clone(), Exit::NOPROC))
            .await;
        }
        signal => {
          tracing::trace!(
            pid = %this,
            signal = signal.kind(),
            from = ?signal.sender(),
            result = "dropped",
            reason = "terminating",
          );
        }
      }
    }
  }
}

impl Drop for GenProc {
  fn drop(&mut self) {
    self.readonly.pid.close();
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
