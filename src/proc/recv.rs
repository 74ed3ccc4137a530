use parking_lot::MutexGuard;
use std::sync::Arc;

use crate::error::Fault;
use crate::lang::Envelope;
use crate::lang::Payload;
use crate::proc::ProcNode;
use crate::proc::ProcState;
use crate::proc::current;

/// Receives the next message of type `T` addressed to the calling process.
///
/// Suspends while no `T` is queued. Messages of other types are left in
/// place, in order.
///
/// # Errors
///
/// Surfaces a pending asynchronous fault ([`Process::kill`], link fan-out,
/// scope teardown) instead of a message.
///
/// [`Process::kill`]: crate::Process::kill
pub async fn receive<T>() -> Result<T, Fault>
where
  T: Payload,
{
  receive_match(|_: &T| true).await
}

/// Selective receive: returns the first queued `T` accepted by `pred`.
///
/// Every message that is not a `T`, or that `pred` rejects, keeps its
/// mailbox slot: after this call returns, the relative order of everything
/// left behind is exactly what it was on entry.
///
/// # Errors
///
/// As [`receive`].
pub async fn receive_match<T, P>(mut pred: P) -> Result<T, Fault>
where
  T: Payload,
  P: FnMut(&T) -> bool,
{
  let node: Arc<ProcNode> = current().node;

  let envelope: Envelope = receive_dyn(&node, |envelope| {
    envelope.peek::<T>().is_some_and(|message| pred(message))
  })
  .await?;

  match envelope.open::<T>() {
    Ok(message) => Ok(message),
    // The filter above only admits envelopes containing a `T`.
    Err(envelope) => Err(Fault::cast::<T>(&envelope)),
  }
}

/// Core blocking receive on `node`'s mailbox.
///
/// Each round: register interest in the node notifier, surface a pending
/// interrupt, scan the mailbox under the state lock, then park. The
/// interest registration precedes the state check so a wakeup between
/// check and await is never lost.
pub(crate) async fn receive_dyn<F>(node: &Arc<ProcNode>, mut filter: F) -> Result<Envelope, Fault>
where
  F: FnMut(&Envelope) -> bool,
{
  let mut marker: usize = 0;

  loop {
    let notified = node.notify.notified();

    tokio::pin!(notified);

    notified.as_mut().enable();

    {
      let mut guard: MutexGuard<'_, ProcState> = node.state.lock();

      if let Some(fault) = guard.interrupt.take() {
        return Err(fault);
      }

      if let Some(envelope) = guard.mailbox.poll(&mut filter, &mut marker) {
        return Ok(envelope);
      }
    }

    notified.await;
  }
}
