//! Supervision: long-running processes owning dynamic sets of children.

mod children;
mod strategy;
mod supervisor;

pub use strategy::NotifyFn;
pub use strategy::Strategy;
pub use supervisor::Supervisor;

pub(crate) use children::Children;
