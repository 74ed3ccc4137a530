use crate::error::Fault;
use crate::lang::Pid;
use crate::proc::Process;

/// The ordered set of a supervisor's live children.
///
/// Dropping the set cancels every remaining child, which carries the
/// supervisor's shutdown guarantee through every exit path, including
/// external cancellation of the supervisor itself.
pub(crate) struct Children {
  live: Vec<Process>,
}

impl Children {
  pub(crate) fn new() -> Self {
    Self { live: Vec::new() }
  }

  /// Appends `child`, ignoring duplicates.
  pub(crate) fn insert(&mut self, child: Process) {
    if !self.live.contains(&child) {
      self.live.push(child);
    }
  }

  /// Removes and returns the child identified by `pid`.
  pub(crate) fn remove(&mut self, pid: Pid) -> Option<Process> {
    let index: usize = self.live.iter().position(|child| child.pid() == pid)?;

    Some(self.live.remove(index))
  }

  /// Cancels every remaining child.
  pub(crate) fn cancel_all(&mut self) {
    for child in self.live.drain(..) {
      tracing::debug!(%child, "supervisor cancelled child");

      child.kill(Fault::DependentActionEnded);
    }
  }
}

impl Drop for Children {
  fn drop(&mut self) {
    self.cancel_all();
  }
}
