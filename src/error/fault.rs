use std::any::Any;
use std::any::type_name;
use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use triomphe::Arc;

use crate::lang::Envelope;
use crate::lang::Payload;
use crate::proc::Process;

/// A shared, type-erased application error.
type BoxError = Box<dyn Error + Send + Sync + 'static>;

// -----------------------------------------------------------------------------
// Fault
// -----------------------------------------------------------------------------

/// A fault terminating or disturbing a process.
///
/// Faults travel three ways: returned from a process body (stored in its
/// terminal status), delivered asynchronously through the interrupt slot
/// ([`kill`], link fan-out, scope teardown), or surfaced by a runtime
/// operation such as a failed query-reply downcast.
///
/// Cloning is cheap: shared payloads sit behind [`Arc`].
///
/// [`kill`]: crate::Process::kill
#[derive(Clone)]
pub enum Fault {
  /// A received envelope's runtime type did not match the expected type in
  /// a context where it must, such as a query reply.
  CouldNotCastDynamic {
    /// Type the caller asked for.
    expected: &'static str,
    /// Type the envelope actually held.
    received: &'static str,
  },
  /// The scope owning this process ended.
  DependentActionEnded,
  /// A linked process terminated.
  LinkedProcessDied {
    /// The process that died.
    who: Process,
    /// Its stored fault, or `None` for a normal exit.
    fault: Option<Arc<Fault>>,
  },
  /// A process body panicked.
  Panic {
    /// The panic payload, rendered as text.
    message: String,
  },
  /// An application error.
  App {
    /// The wrapped error.
    error: Arc<BoxError>,
  },
}

impl Fault {
  /// Wraps an application error.
  pub fn app<E>(error: E) -> Self
  where
    E: Error + Send + Sync + 'static,
  {
    let boxed: BoxError = Box::new(error);

    Self::App {
      error: Arc::new(boxed),
    }
  }

  /// Builds a cast failure for an envelope that was expected to hold a `T`.
  pub(crate) fn cast<T>(envelope: &Envelope) -> Self
  where
    T: Payload,
  {
    Self::CouldNotCastDynamic {
      expected: type_name::<T>(),
      received: envelope.name(),
    }
  }

  /// Builds the fault delivered to a linked peer when `who` dies.
  pub(crate) fn linked(who: Process, fault: Option<Fault>) -> Self {
    Self::LinkedProcessDied {
      who,
      fault: fault.map(Arc::new),
    }
  }

  /// Converts a caught panic payload into a fault.
  pub(crate) fn panic(payload: Box<dyn Any + Send>) -> Self {
    let message: String = match payload.downcast::<String>() {
      Ok(message) => *message,
      Err(payload) => match payload.downcast::<&'static str>() {
        Ok(message) => (*message).to_string(),
        Err(_) => String::from("opaque panic payload"),
      },
    };

    Self::Panic { message }
  }

  // ---------------------------------------------------------------------------
  // Predicates
  // ---------------------------------------------------------------------------

  /// Returns `true` if this is a failed dynamic cast.
  #[inline]
  pub const fn is_cast(&self) -> bool {
    matches!(self, Self::CouldNotCastDynamic { .. })
  }

  /// Returns `true` if this fault ends a dependent scope.
  #[inline]
  pub const fn is_dependent(&self) -> bool {
    matches!(self, Self::DependentActionEnded)
  }

  /// Returns `true` if this fault came from a linked process's death.
  #[inline]
  pub const fn is_linked(&self) -> bool {
    matches!(self, Self::LinkedProcessDied { .. })
  }

  /// Returns `true` if this fault came from a caught panic.
  #[inline]
  pub const fn is_panic(&self) -> bool {
    matches!(self, Self::Panic { .. })
  }

  /// Returns `true` if this fault wraps an application error.
  #[inline]
  pub const fn is_app(&self) -> bool {
    matches!(self, Self::App { .. })
  }
}

impl Debug for Fault {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for Fault {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::CouldNotCastDynamic { expected, received } => {
        write!(f, "could not cast dynamic: expected {expected}, received {received}")
      }
      Self::DependentActionEnded => f.write_str("dependent action ended"),
      Self::LinkedProcessDied { who, fault: Some(fault) } => {
        write!(f, "linked process {who} died: {}", &**fault)
      }
      Self::LinkedProcessDied { who, fault: None } => {
        write!(f, "linked process {who} exited")
      }
      Self::Panic { message } => write!(f, "panic: {message}"),
      Self::App { error } => Display::fmt(&***error, f),
    }
  }
}

impl Error for Fault {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      Self::LinkedProcessDied { fault: Some(fault), .. } => Some(&**fault),
      Self::App { error } => Some(&***error),
      _ => None,
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cast_fault_names_both_types() {
    let envelope: Envelope = Envelope::new(5_i32);
    let fault: Fault = Fault::cast::<String>(&envelope);

    assert!(fault.is_cast());

    let text: String = fault.to_string();

    assert!(text.contains("alloc::string::String"), "{text}");
    assert!(text.contains("i32"), "{text}");
  }

  #[test]
  fn panic_fault_extracts_str_payloads() {
    let fault: Fault = Fault::panic(Box::new("boom"));

    assert!(fault.is_panic());
    assert_eq!(fault.to_string(), "panic: boom");

    let fault: Fault = Fault::panic(Box::new(String::from("bang")));

    assert_eq!(fault.to_string(), "panic: bang");

    let fault: Fault = Fault::panic(Box::new(7_u8));

    assert_eq!(fault.to_string(), "panic: opaque panic payload");
  }

  #[test]
  fn app_fault_exposes_source() {
    let error: std::io::Error = std::io::Error::other("disk on fire");
    let fault: Fault = Fault::app(error);

    assert!(fault.is_app());
    assert!(std::error::Error::source(&fault).is_some());
    assert_eq!(fault.to_string(), "disk on fire");
  }
}
