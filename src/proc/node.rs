use hashbrown::HashMap;
use parking_lot::Mutex;
use parking_lot::MutexGuard;
use std::sync::Weak;
use tokio::sync::Notify;

use crate::consts::CAP_OBSERVERS;
use crate::error::Fault;
use crate::lang::Envelope;
use crate::lang::Exit;
use crate::lang::Pid;
use crate::lang::RuntimeId;
use crate::proc::Mailbox;

// -----------------------------------------------------------------------------
// Proc Node
// -----------------------------------------------------------------------------

/// The shared record backing one process.
///
/// Handles, the registry, and observer sets all point at the same node.
/// The identity fields are immutable; everything mutable lives behind one
/// lock so that every multi-variable transition (liveness check plus
/// observer registration, status fill plus observer snapshot) is a single
/// critical section.
pub(crate) struct ProcNode {
  /// Ordered process identity.
  pub(crate) pid: Pid,
  /// Host activity identity; the registry key.
  pub(crate) rid: RuntimeId,
  /// State guarded by the process-wide lock.
  pub(crate) state: Mutex<ProcState>,
  /// Wakeup channel for mailbox-nonempty, interrupt-pending, and
  /// status-filled. Waiters re-check state after every wakeup.
  pub(crate) notify: Notify,
}

// -----------------------------------------------------------------------------
// Proc State
// -----------------------------------------------------------------------------

/// Mutable process state.
///
/// # Fields
///
/// - `mailbox`: undelivered messages, in arrival order
/// - `links`: peers to interrupt when this process dies
/// - `monitors`: peers to message when this process dies
/// - `status`: terminal status; `None` while running, assigned once
/// - `interrupt`: pending asynchronous fault; first post wins
pub(crate) struct ProcState {
  pub(crate) mailbox: Mailbox,
  pub(crate) links: HashMap<Pid, Weak<ProcNode>>,
  pub(crate) monitors: HashMap<Pid, Weak<ProcNode>>,
  pub(crate) status: Option<Exit>,
  pub(crate) interrupt: Option<Fault>,
}

impl ProcNode {
  /// Creates a live process record with empty mailbox and observer sets.
  pub(crate) fn new(pid: Pid, rid: RuntimeId) -> Self {
    Self {
      pid,
      rid,
      state: Mutex::new(ProcState {
        mailbox: Mailbox::new(),
        links: HashMap::with_capacity(CAP_OBSERVERS),
        monitors: HashMap::with_capacity(CAP_OBSERVERS),
        status: None,
        interrupt: None,
      }),
      notify: Notify::new(),
    }
  }

  /// Appends a message to the mailbox.
  ///
  /// A terminated process discards the message silently; senders that need
  /// delivery guarantees monitor the target or use a query.
  pub(crate) fn push(&self, message: Envelope) {
    let mut guard: MutexGuard<'_, ProcState> = self.state.lock();

    if guard.status.is_some() {
      return;
    }

    guard.mailbox.push(message);

    drop(guard);

    self.notify.notify_waiters();
  }

  /// Posts an asynchronous fault.
  ///
  /// The first post wins: a process terminates with at most one fault, and
  /// later posts (including any aimed at an already-terminated process)
  /// are discarded.
  pub(crate) fn post_interrupt(&self, fault: Fault) {
    let mut guard: MutexGuard<'_, ProcState> = self.state.lock();

    if guard.status.is_some() {
      return;
    }

    if guard.interrupt.is_none() {
      guard.interrupt = Some(fault);
    }

    drop(guard);

    self.notify.notify_waiters();
  }
}
