use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::num::NonZeroU64;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::ThreadId;
use tokio::task;

// -----------------------------------------------------------------------------
// Pid
// -----------------------------------------------------------------------------

/// The ordered identity of a process.
///
/// Drawn from a global monotone counter at process creation; equality,
/// ordering, and hashing on [`Process`] delegate to this value.
///
/// [`Process`]: crate::Process
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Pid(NonZeroU64);

impl Pid {
  /// Returns the next unused process identity.
  pub(crate) fn next() -> Self {
    static COUNTER: AtomicU64 = AtomicU64::new(1);

    let raw: u64 = COUNTER.fetch_add(1, Ordering::Relaxed);

    // The counter starts at one and would have to wrap to produce zero.
    Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
  }

  /// Returns the identity as a plain integer.
  #[inline]
  pub const fn as_u64(self) -> u64 {
    self.0.get()
  }
}

impl Debug for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "Pid(#{})", self.0)
  }
}

impl Display for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "#{}", self.0)
  }
}

// -----------------------------------------------------------------------------
// Runtime Id
// -----------------------------------------------------------------------------

/// The stable identity of the host activity backing a process.
///
/// This is the registry key. Spawned processes are keyed by their Tokio
/// task; activities without a task context (a `block_on` future, a bare
/// thread calling in) are keyed by their thread, which stays stable
/// because `block_on` polls on the calling thread.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) enum RuntimeId {
  Task(task::Id),
  Thread(ThreadId),
}

impl RuntimeId {
  /// Wraps a known task identity.
  #[inline]
  pub(crate) const fn from_task(id: task::Id) -> Self {
    Self::Task(id)
  }

  /// Returns the identity of the calling activity.
  #[inline]
  pub(crate) fn current() -> Self {
    match task::try_id() {
      Some(id) => Self::Task(id),
      None => Self::Thread(thread::current().id()),
    }
  }
}

impl Display for RuntimeId {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Task(id) => write!(f, "task:{id}"),
      Self::Thread(id) => write!(f, "thread:{id:?}"),
    }
  }
}
