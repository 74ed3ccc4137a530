//! Process primitives: records, mailboxes, the registry, and lifecycle.

mod dispatch;
mod handle;
mod link;
mod mailbox;
mod node;
mod recv;
mod registry;
mod rpc;
mod signal;
mod spawn;
mod task;

pub use dispatch::Dispatch;
pub use handle::Process;
pub use link::demonitor;
pub use link::link;
pub use link::monitor;
pub use link::unlink;
pub use recv::receive;
pub use recv::receive_match;
pub use registry::current;
pub use registry::processes;
pub use rpc::query;
pub use rpc::respond;
pub use signal::Died;
pub use signal::Stop;
pub use spawn::delayed;
pub use spawn::spawn;
pub use spawn::spawn_link;
pub use spawn::spawn_monitor;
pub use spawn::with_process;

pub(crate) use mailbox::Mailbox;
pub(crate) use node::ProcNode;
pub(crate) use node::ProcState;
pub(crate) use recv::receive_dyn;
pub(crate) use rpc::Reply;
pub(crate) use rpc::Request;
pub(crate) use spawn::cleanup;
pub(crate) use task::ProcTask;
