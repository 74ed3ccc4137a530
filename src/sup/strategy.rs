use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;

use crate::error::Fault;
use crate::proc::Process;

/// Callback invoked by [`Strategy::Notify`] once per child termination.
///
/// Receives the terminated child and its fault (`None` for a normal exit).
/// Returning an error cancels all remaining children and terminates the
/// supervisor with that fault.
pub type NotifyFn = Arc<dyn Fn(&Process, Option<&Fault>) -> Result<(), Fault> + Send + Sync>;

/// The reaction a supervisor applies when a child terminates.
#[derive(Clone)]
pub enum Strategy {
  /// Drop the child from state and continue, whatever its outcome.
  IgnoreAll,
  /// Drop normal exits and continue; on a faulted child, cancel all
  /// remaining children and terminate with that fault.
  IgnoreGraceful,
  /// Cancel all remaining children on any termination; terminate with the
  /// child's fault, or normally after a clean exit.
  KillAll,
  /// Drop the child and invoke the callback with its outcome.
  Notify(NotifyFn),
}

impl Strategy {
  /// Wraps `f` as a [`Strategy::Notify`].
  pub fn notify<F>(f: F) -> Self
  where
    F: Fn(&Process, Option<&Fault>) -> Result<(), Fault> + Send + Sync + 'static,
  {
    Self::Notify(Arc::new(f))
  }
}

impl Debug for Strategy {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::IgnoreAll => f.write_str("IgnoreAll"),
      Self::IgnoreGraceful => f.write_str("IgnoreGraceful"),
      Self::KillAll => f.write_str("KillAll"),
      Self::Notify(_) => f.write_str("Notify(..)"),
    }
  }
}
