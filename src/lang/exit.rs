use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::error::Fault;

/// The terminal status of a process.
///
/// Published exactly once, by the cleanup path, and observed by monitors,
/// links, and [`Process::wait`].
///
/// [`Process::wait`]: crate::Process::wait
#[derive(Clone)]
pub enum Exit {
  /// The process body completed without error.
  Normal,
  /// The process terminated with a fault.
  Fault(Fault),
}

impl Exit {
  /// Returns `true` if the process exited cleanly.
  #[inline]
  pub const fn is_normal(&self) -> bool {
    matches!(self, Self::Normal)
  }

  /// Returns `true` if the process terminated with a fault.
  #[inline]
  pub const fn is_fault(&self) -> bool {
    matches!(self, Self::Fault(_))
  }

  /// Returns the stored fault, if any.
  #[inline]
  pub fn fault(&self) -> Option<&Fault> {
    match self {
      Self::Normal => None,
      Self::Fault(fault) => Some(fault),
    }
  }

  /// Consumes the status, returning the stored fault, if any.
  #[inline]
  pub fn into_fault(self) -> Option<Fault> {
    match self {
      Self::Normal => None,
      Self::Fault(fault) => Some(fault),
    }
  }
}

impl Debug for Exit {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Normal => f.write_str("Normal"),
      Self::Fault(fault) => write!(f, "Fault({fault})"),
    }
  }
}

impl Display for Exit {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Normal => f.write_str("normal"),
      Self::Fault(fault) => Display::fmt(fault, f),
    }
  }
}

impl From<Fault> for Exit {
  #[inline]
  fn from(other: Fault) -> Self {
    Self::Fault(other)
  }
}

impl From<Result<(), Fault>> for Exit {
  #[inline]
  fn from(other: Result<(), Fault>) -> Self {
    match other {
      Ok(()) => Self::Normal,
      Err(fault) => Self::Fault(fault),
    }
  }
}
