use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::consts::CAP_MAILBOX;
use crate::lang::Envelope;

// -----------------------------------------------------------------------------
// Mailbox
// -----------------------------------------------------------------------------

/// Unbounded FIFO of type-erased messages addressed to one process.
///
/// Selective receive scans in place: unmatched messages keep their slots,
/// so the relative order of everything left behind is exactly the arrival
/// order. The caller-held `marker` resumes a scan past the prefix already
/// rejected by the current filter, instead of re-testing it on every
/// wakeup.
pub(crate) struct Mailbox {
  queue: Vec<Envelope>,
}

impl Mailbox {
  #[inline]
  pub(crate) fn new() -> Self {
    Self {
      queue: Vec::with_capacity(CAP_MAILBOX),
    }
  }

  /// Appends a message to the back of the queue.
  #[inline]
  pub(crate) fn push(&mut self, message: Envelope) {
    self.queue.push(message);
  }

  /// Removes and returns the first message accepted by `filter`, starting
  /// the scan at `marker`.
  ///
  /// On a miss the marker is parked at the queue end, so the next poll with
  /// the same filter only examines newly arrived messages.
  pub(crate) fn poll<F>(&mut self, filter: &mut F, marker: &mut usize) -> Option<Envelope>
  where
    F: FnMut(&Envelope) -> bool,
  {
    for index in (*marker)..self.queue.len() {
      if filter(&self.queue[index]) {
        *marker = 0;
        return Some(self.queue.remove(index));
      }
    }

    *marker = self.queue.len();

    None
  }
}

impl Debug for Mailbox {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("Mailbox ")?;
    f.debug_list().entries(self.queue.iter()).finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
