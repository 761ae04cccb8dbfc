//! Backtrace capture at the point of a panic.
//!
//! A caught panic has already unwound by the time the payload is returned,
//! so a backtrace taken afterwards only shows the catching frames. The hook
//! installed here records the backtrace on the panicking thread before
//! unwinding starts; [`CatchUnwind`] resolves within the same poll on the
//! same thread, so the catcher can pick it up with [`take_panic_trace`].
//!
//! [`CatchUnwind`]: crate::utils::CatchUnwind

use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic;
use std::panic::PanicHookInfo;
use std::sync::Once;

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static>;

thread_local! {
  static PANIC_TRACE: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// Installs the recording panic hook. Idempotent.
///
/// The previously installed hook still runs after the backtrace is recorded.
pub(crate) fn install_panic_trace() {
  INSTALL.call_once(|| {
    let previous: PanicHook = panic::take_hook();

    panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
      let trace: Backtrace = Backtrace::force_capture();
      let _ignore: Result<_, _> = PANIC_TRACE.try_with(|cell| cell.replace(Some(trace)));

      previous(info);
    }));
  });
}

/// Takes the backtrace recorded by the latest panic on this thread.
#[inline]
pub(crate) fn take_panic_trace() -> Option<Backtrace> {
  PANIC_TRACE.try_with(RefCell::take).ok().flatten()
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
