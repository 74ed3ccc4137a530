use crate::error::Fault;
use crate::proc::Process;

// -----------------------------------------------------------------------------
// Stop
// -----------------------------------------------------------------------------

/// A cooperative stop request.
///
/// Sent by [`Process::stop`]; the target only winds down if it receives the
/// message and chooses to act on it.
///
/// [`Process::stop`]: crate::Process::stop
#[derive(Clone, Debug)]
pub struct Stop {
  /// The process that requested the stop.
  pub from: Process,
}

// -----------------------------------------------------------------------------
// Died
// -----------------------------------------------------------------------------

/// A monitor notification: a watched process terminated.
///
/// Enqueued by the watched process's cleanup for every registered monitor,
/// or immediately by [`monitor`] when the target is already dead.
///
/// [`monitor`]: crate::monitor
#[derive(Clone, Debug)]
pub struct Died {
  /// The terminated process.
  pub who: Process,
  /// Its stored fault, or `None` for a normal exit.
  pub fault: Option<Fault>,
}
