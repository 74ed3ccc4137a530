use std::any::Any;
use std::any::type_name;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

// -----------------------------------------------------------------------------
// Payload
// -----------------------------------------------------------------------------

/// A value that can travel through a process mailbox.
///
/// Blanket-implemented for every `Any + Send` type. Messages are moved,
/// never cloned, so neither `Clone` nor `Debug` is required of them.
pub trait Payload: Any + Send {}

impl<T> Payload for T where T: Any + Send {}

// -----------------------------------------------------------------------------
// Envelope
// -----------------------------------------------------------------------------

/// A type-erased message.
///
/// Construction preserves the payload's runtime type identity so selective
/// receive can test and downcast without consuming mismatched messages.
/// The payload's `type_name` is kept alongside for cast diagnostics.
pub struct Envelope {
  name: &'static str,
  data: Box<dyn Any + Send>,
}

impl Envelope {
  /// Seals `value` into an envelope.
  #[inline]
  pub(crate) fn new<T>(value: T) -> Self
  where
    T: Payload,
  {
    Self {
      name: type_name::<T>(),
      data: Box::new(value),
    }
  }

  /// Returns the `type_name` of the contained payload.
  #[inline]
  pub const fn name(&self) -> &'static str {
    self.name
  }

  /// Returns `true` if the payload is a `T`.
  #[inline]
  pub fn is<T>(&self) -> bool
  where
    T: Payload,
  {
    self.data.is::<T>()
  }

  /// Returns a shared reference to the payload as `T`.
  #[inline]
  pub fn peek<T>(&self) -> Option<&T>
  where
    T: Payload,
  {
    self.data.downcast_ref::<T>()
  }

  /// Unwraps the payload as `T`, handing the envelope back on mismatch.
  #[inline]
  pub fn open<T>(self) -> Result<T, Envelope>
  where
    T: Payload,
  {
    match self.data.downcast::<T>() {
      Ok(data) => Ok(*data),
      Err(data) => Err(Self { name: self.name, data }),
    }
  }
}

impl Debug for Envelope {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "Envelope({})", self.name)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
