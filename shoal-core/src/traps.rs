//! Signal dispositions held by the shell process.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error;
use crate::sys;

static SIGINT_RECEIVED: AtomicBool = AtomicBool::new(false);

extern "C" fn note_sigint(_signo: nix::libc::c_int) {
    SIGINT_RECEIVED.store(true, Ordering::SeqCst);
}

/// Sets up the dispositions the shell holds for its whole lifetime. SIGQUIT
/// is ignored so that Ctrl-\ reaches foreground children but never kills the
/// shell itself.
pub fn initialize_signal_handling() -> Result<(), error::Error> {
    sys::signal::ignore_sigquit()
}

/// RAII guard that routes SIGINT to a flag while held. The handler is
/// installed without `SA_RESTART`, so a blocking read in progress fails with
/// `EINTR` instead of resuming, letting the caller abandon the read. The
/// previous disposition is restored on drop.
pub(crate) struct InterruptGuard {
    previous: nix::sys::signal::SigAction,
}

impl InterruptGuard {
    pub(crate) fn install() -> Result<Self, error::Error> {
        SIGINT_RECEIVED.store(false, Ordering::SeqCst);
        let previous = sys::signal::install_sigint_handler(note_sigint)?;
        Ok(Self { previous })
    }

    pub(crate) fn interrupted(&self) -> bool {
        SIGINT_RECEIVED.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
pub(crate) fn set_pending_interrupt() {
    SIGINT_RECEIVED.store(true, Ordering::SeqCst);
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        if sys::signal::restore_sigint_action(&self.previous).is_err() {
            tracing::warn!("failed to restore SIGINT disposition");
        }
    }
}
