//! Runtime error types.

mod fault;

pub use fault::Fault;
