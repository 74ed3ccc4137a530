use std::sync::Arc;
use tokio::task::futures::TaskLocalFuture;

use crate::error::Fault;
use crate::lang::Exit;
use crate::proc::ProcNode;
use crate::proc::cleanup;

// -----------------------------------------------------------------------------
// Task Globals
// -----------------------------------------------------------------------------

tokio::task_local! {
  static CONTEXT: ProcTask;
}

// -----------------------------------------------------------------------------
// Proc Task
// -----------------------------------------------------------------------------

/// Owner-side wrapper for a spawned process.
///
/// Lives in the task-local context for the lifetime of the process task.
/// Dropping it runs cleanup, so a task torn down before its own cleanup
/// (e.g. at runtime shutdown) still publishes a terminal status, notifies
/// observers, and scrubs the registry.
pub(crate) struct ProcTask {
  pub(crate) node: Arc<ProcNode>,
}

impl ProcTask {
  #[inline]
  pub(crate) fn new(node: Arc<ProcNode>) -> Self {
    Self { node }
  }

  /// Installs this process as the calling task's context.
  #[inline]
  pub(crate) fn scope<F>(self, future: F) -> TaskLocalFuture<ProcTask, F>
  where
    F: Future,
  {
    CONTEXT.scope(self, future)
  }

  /// Runs `f` against the calling task's process context, if one is set.
  #[inline]
  pub(crate) fn try_with<F, R>(f: F) -> Option<R>
  where
    F: FnOnce(&ProcTask) -> R,
  {
    CONTEXT.try_with(f).ok()
  }
}

impl Drop for ProcTask {
  fn drop(&mut self) {
    // Normal termination has already published a status and this is a
    // no-op; it only takes effect for tasks dropped before their cleanup.
    cleanup(&self.node, Exit::Fault(Fault::DependentActionEnded));
  }
}
