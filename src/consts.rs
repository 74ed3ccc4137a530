//! Runtime configuration constants and default values.
//!
//! These constants control the initial sizing of the runtime's data
//! structures. None of them is a hard limit: mailboxes, observer sets, and
//! the registry all grow on demand.

// -----------------------------------------------------------------------------
// Memory Allocation
// -----------------------------------------------------------------------------

/// Initial capacity of a process mailbox.
///
/// Most processes hold only a handful of undelivered messages at a time;
/// the queue reallocates when a burst exceeds this.
pub const CAP_MAILBOX: usize = 8;

/// Initial capacity of the per-process link and monitor sets.
pub const CAP_OBSERVERS: usize = 4;

/// Initial capacity of the global process registry.
pub const CAP_REGISTRY: usize = 64;
