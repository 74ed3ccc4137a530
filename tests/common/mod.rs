#![allow(dead_code)]

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use weft::Fault;

/// Marker error for exercising fault propagation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Boom(pub &'static str);

impl Display for Boom {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "boom: {}", self.0)
  }
}

impl Error for Boom {}

/// Wraps a tagged [`Boom`] as an application fault.
pub fn boom(tag: &'static str) -> Fault {
  Fault::app(Boom(tag))
}

/// Installs a subscriber honoring `RUST_LOG`. Safe to call from every
/// test; only the first call in the binary wins.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}
