use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use crate::error::Fault;
use crate::lang::Envelope;
use crate::lang::Exit;
use crate::lang::Payload;
use crate::lang::Pid;
use crate::proc::ProcNode;
use crate::proc::Stop;
use crate::proc::current;

// -----------------------------------------------------------------------------
// Process
// -----------------------------------------------------------------------------

/// A handle to a process.
///
/// Cloning is cheap; all clones refer to the same underlying record.
/// Equality, ordering, and hashing are defined by [`Pid`] alone, so handles
/// work as map keys and can be compared across clones.
#[derive(Clone)]
pub struct Process {
  pub(crate) node: Arc<ProcNode>,
}

impl Process {
  #[inline]
  pub(crate) fn new(node: Arc<ProcNode>) -> Self {
    Self { node }
  }

  /// Returns the process identity.
  #[inline]
  pub fn pid(&self) -> Pid {
    self.node.pid
  }

  // ---------------------------------------------------------------------------
  // Messaging
  // ---------------------------------------------------------------------------

  /// Sends `message` to this process.
  ///
  /// Never fails and never blocks. A terminated receiver discards the
  /// message silently; use [`monitor`] or [`query`] when delivery matters
  /// to the sender.
  ///
  /// [`monitor`]: crate::monitor
  /// [`query`]: crate::query
  pub fn send<T>(&self, message: T)
  where
    T: Payload,
  {
    self.node.push(Envelope::new(message));
  }

  /// Requests a cooperative stop.
  ///
  /// Enqueues [`Stop`] carrying the calling process; the target decides
  /// when (and whether) to receive it and wind down.
  pub fn stop(&self) {
    self.send(Stop { from: current() });
  }

  // ---------------------------------------------------------------------------
  // Termination
  // ---------------------------------------------------------------------------

  /// Delivers `fault` to this process as an asynchronous exception.
  ///
  /// A spawned process is preempted at its next poll; an adopted task
  /// observes the fault at its next runtime suspension point. Killing a
  /// terminated process is a no-op.
  pub fn kill(&self, fault: Fault) {
    self.node.post_interrupt(fault);
  }

  /// Returns `true` while the terminal status is unset.
  pub fn is_running(&self) -> bool {
    self.node.state.lock().status.is_none()
  }

  /// Returns the stored fault of a terminated process.
  ///
  /// `None` while the process runs, and after a normal exit.
  pub fn fault(&self) -> Option<Fault> {
    match &self.node.state.lock().status {
      Some(Exit::Fault(fault)) => Some(fault.clone()),
      _ => None,
    }
  }

  /// Returns the terminal status, or `None` while the process runs.
  pub fn status(&self) -> Option<Exit> {
    self.node.state.lock().status.clone()
  }

  /// Suspends until this process terminates, returning its status.
  ///
  /// Returns immediately if the process has already terminated. Any number
  /// of waiters may wait on the same process.
  pub async fn wait(&self) -> Exit {
    loop {
      let notified = self.node.notify.notified();

      tokio::pin!(notified);

      // Register interest before checking, so a fill between the check and
      // the await still wakes us.
      notified.as_mut().enable();

      {
        let guard = self.node.state.lock();

        if let Some(exit) = &guard.status {
          return exit.clone();
        }
      }

      notified.await;
    }
  }
}

// -----------------------------------------------------------------------------
// Identity
// -----------------------------------------------------------------------------

impl PartialEq for Process {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.pid() == other.pid()
  }
}

impl Eq for Process {}

impl PartialOrd for Process {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Process {
  #[inline]
  fn cmp(&self, other: &Self) -> Ordering {
    self.pid().cmp(&other.pid())
  }
}

impl Hash for Process {
  #[inline]
  fn hash<H>(&self, state: &mut H)
  where
    H: Hasher,
  {
    self.pid().hash(state);
  }
}

impl Debug for Process {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "Process({})", self.pid())
  }
}

impl Display for Process {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(&self.pid(), f)
  }
}
