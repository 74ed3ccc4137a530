//! Weft - an in-process actor runtime.
//!
//! A process is a Tokio task with a type-erased FIFO mailbox, observer sets
//! for failure propagation, and a single-assignment terminal status:
//!
//! - [`spawn`] starts a process; [`with_process`] scopes one to a block.
//! - [`Process::send`] and the `receive*` family exchange typed messages;
//!   [`Dispatch`] performs ordered multi-pattern receives.
//! - [`link`] propagates a peer's death as an asynchronous [`Fault`];
//!   [`monitor`] delivers it as a [`Died`] message instead.
//! - [`query`] and [`respond`] build synchronous request/reply exchanges on
//!   top of two sends and a tagged receive.
//! - [`Supervisor`] owns a dynamic set of children and reacts to their
//!   termination according to a [`Strategy`].

mod error;
mod lang;
mod proc;
mod sup;
mod utils;

pub mod consts;

pub use crate::error::Fault;

pub use crate::lang::Envelope;
pub use crate::lang::Exit;
pub use crate::lang::Payload;
pub use crate::lang::Pid;

pub use crate::proc::Died;
pub use crate::proc::Dispatch;
pub use crate::proc::Process;
pub use crate::proc::Stop;
pub use crate::proc::current;
pub use crate::proc::delayed;
pub use crate::proc::demonitor;
pub use crate::proc::link;
pub use crate::proc::monitor;
pub use crate::proc::processes;
pub use crate::proc::query;
pub use crate::proc::receive;
pub use crate::proc::receive_match;
pub use crate::proc::respond;
pub use crate::proc::spawn;
pub use crate::proc::spawn_link;
pub use crate::proc::spawn_monitor;
pub use crate::proc::unlink;
pub use crate::proc::with_process;

pub use crate::sup::NotifyFn;
pub use crate::sup::Strategy;
pub use crate::sup::Supervisor;
