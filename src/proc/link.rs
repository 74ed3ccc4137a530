// -----------------------------------------------------------------------------
// Process Links & Monitors
//
// The liveness check and the observer registration share one critical
// section on the remote's state lock: a concurrent death either sees the
// caller in its snapshot or has already published a status this call
// observes, never neither.
// -----------------------------------------------------------------------------

use parking_lot::MutexGuard;
use std::sync::Arc;

use crate::error::Fault;
use crate::lang::Envelope;
use crate::proc::Died;
use crate::proc::ProcState;
use crate::proc::Process;
use crate::proc::current;

/// Registers the calling process for termination notification from
/// `remote`.
///
/// While `remote` runs, the caller joins its link set (idempotent per
/// caller). When `remote` dies, the caller receives
/// [`Fault::LinkedProcessDied`] as an asynchronous exception. If `remote`
/// has already terminated, that fault is delivered immediately.
///
/// Linking to yourself is allowed and, like any other link, fires at
/// cleanup.
pub fn link(remote: &Process) {
  let me: Process = current();
  let mut guard: MutexGuard<'_, ProcState> = remote.node.state.lock();

  match &guard.status {
    None => {
      guard.links.insert(me.pid(), Arc::downgrade(&me.node));

      drop(guard);

      tracing::trace!(observer = %me, target = %remote, "link");
    }
    Some(exit) => {
      let fault: Option<Fault> = exit.fault().cloned();

      drop(guard);

      me.node.post_interrupt(Fault::linked(remote.clone(), fault));
    }
  }
}

/// Removes the calling process from `remote`'s link set.
///
/// Always succeeds; unlinking a process you never linked, or one that has
/// already terminated, does nothing.
pub fn unlink(remote: &Process) {
  let me: Process = current();

  remote.node.state.lock().links.remove(&me.pid());
}

/// Starts watching `remote`.
///
/// While `remote` runs, the caller joins its monitor set (idempotent per
/// caller). When `remote` dies, a [`Died`] message lands in the caller's
/// mailbox. If `remote` has already terminated, the [`Died`] is enqueued
/// immediately.
pub fn monitor(remote: &Process) {
  let me: Process = current();
  let mut guard: MutexGuard<'_, ProcState> = remote.node.state.lock();

  match &guard.status {
    None => {
      guard.monitors.insert(me.pid(), Arc::downgrade(&me.node));

      drop(guard);

      tracing::trace!(observer = %me, target = %remote, "monitor");
    }
    Some(exit) => {
      let fault: Option<Fault> = exit.fault().cloned();

      drop(guard);

      me.node.push(Envelope::new(Died {
        who: remote.clone(),
        fault,
      }));
    }
  }
}

/// Stops watching `remote`.
///
/// Always succeeds. A [`Died`] already enqueued by a concurrent death is
/// not recalled.
pub fn demonitor(remote: &Process) {
  let me: Process = current();

  remote.node.state.lock().monitors.remove(&me.pid());
}
