//! Signal handling helpers.

use crate::error;

pub(crate) use tokio::signal::ctrl_c as await_ctrl_c;

/// Installs a process-wide ignore disposition for SIGQUIT so Ctrl-\ never
/// kills the shell itself. Ignored dispositions survive exec, so spawned
/// children must restore the default before exec.
pub(crate) fn ignore_sigquit() -> Result<(), error::Error> {
    let ignore = nix::sys::signal::SigAction::new(
        nix::sys::signal::SigHandler::SigIgn,
        nix::sys::signal::SaFlags::empty(),
        nix::sys::signal::SigSet::empty(),
    );
    // SAFETY: installs a well-formed ignore disposition; no handler code runs.
    unsafe { nix::sys::signal::sigaction(nix::sys::signal::Signal::SIGQUIT, &ignore) }?;
    Ok(())
}

/// Restores the default disposition for SIGQUIT. Makes only
/// async-signal-safe calls, so it may run in a forked child before exec.
pub(crate) fn reset_sigquit_for_child() {
    // SAFETY: installs the default disposition; no handler code runs.
    unsafe { nix::libc::signal(nix::libc::SIGQUIT, nix::libc::SIG_DFL) };
}

/// Installs the given SIGINT handler without `SA_RESTART`, so that blocking
/// reads observe `EINTR` when the user interrupts. Returns the previously
/// installed action.
pub(crate) fn install_sigint_handler(
    handler: extern "C" fn(nix::libc::c_int),
) -> Result<nix::sys::signal::SigAction, error::Error> {
    let action = nix::sys::signal::SigAction::new(
        nix::sys::signal::SigHandler::Handler(handler),
        nix::sys::signal::SaFlags::empty(),
        nix::sys::signal::SigSet::empty(),
    );
    // SAFETY: the handler is async-signal-safe; it only stores to an atomic.
    let prev = unsafe { nix::sys::signal::sigaction(nix::sys::signal::Signal::SIGINT, &action) }?;
    Ok(prev)
}

/// Restores a previously captured SIGINT action.
pub(crate) fn restore_sigint_action(
    prev: &nix::sys::signal::SigAction,
) -> Result<(), error::Error> {
    // SAFETY: restores an action previously returned by sigaction.
    unsafe { nix::sys::signal::sigaction(nix::sys::signal::Signal::SIGINT, prev) }?;
    Ok(())
}
