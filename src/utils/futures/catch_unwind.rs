// Polling shape borrowed from:
//
// https://docs.rs/futures/0.3.31/futures/future/struct.CatchUnwind.html

use pin_project_lite::pin_project;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use crate::error::Fault;

pin_project! {
  /// Future wrapper that converts a panic in the inner future into
  /// [`Fault::Panic`].
  ///
  /// A panicking process body must terminate its own process only; catching
  /// at the poll boundary keeps the unwind from crossing into the runtime.
  #[repr(transparent)]
  pub(crate) struct CatchUnwind<F> {
    #[pin]
    future: F,
  }
}

impl<F> CatchUnwind<F>
where
  F: Future,
{
  #[inline]
  pub(crate) const fn new(future: F) -> Self {
    Self { future }
  }
}

impl<F> Future for CatchUnwind<F>
where
  F: Future,
{
  type Output = Result<F::Output, Fault>;

  fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
    let future: Pin<&mut F> = self.project().future;
    let assert: AssertUnwindSafe<_> = AssertUnwindSafe(|| future.poll(context));

    match panic::catch_unwind(assert) {
      Ok(poll) => poll.map(Ok),
      Err(payload) => Poll::Ready(Err(Fault::panic(payload))),
    }
  }
}
