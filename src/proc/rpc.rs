// -----------------------------------------------------------------------------
// Query / Respond
//
// A query is two sends and a tagged receive: the request carries the
// caller's handle, the reply carries the responder's identity. Tagging
// replies by responder lets one mailbox demultiplex any number of
// outstanding queries.
// -----------------------------------------------------------------------------

use crate::error::Fault;
use crate::lang::Envelope;
use crate::lang::Payload;
use crate::lang::Pid;
use crate::proc::Process;
use crate::proc::current;
use crate::proc::receive_match;

// -----------------------------------------------------------------------------
// Wire Envelopes
// -----------------------------------------------------------------------------

/// A query request: the requester's handle plus the erased question.
pub(crate) struct Request {
  pub(crate) from: Process,
  pub(crate) body: Envelope,
}

/// A query reply, tagged with the responder's identity.
pub(crate) struct Reply {
  pub(crate) from: Pid,
  pub(crate) body: Envelope,
}

// -----------------------------------------------------------------------------
// Operations
// -----------------------------------------------------------------------------

/// Sends `question` to `remote` and suspends until its reply arrives.
///
/// Replies are matched by the responder's identity, so interleaved replies
/// from other processes are left untouched in the mailbox.
///
/// # Errors
///
/// - [`Fault::CouldNotCastDynamic`] when the reply payload is not an `R`.
/// - A pending asynchronous fault, as with [`receive`].
///
/// A `remote` that never replies (including one that terminated before the
/// request arrived) suspends this call indefinitely; pair the query with a
/// [`monitor`] when that matters.
///
/// [`receive`]: crate::receive
/// [`monitor`]: crate::monitor
pub async fn query<Q, R>(question: Q, remote: &Process) -> Result<R, Fault>
where
  Q: Payload,
  R: Payload,
{
  let me: Process = current();

  remote.send(Request {
    from: me,
    body: Envelope::new(question),
  });

  let from: Pid = remote.pid();
  let reply: Reply = receive_match(move |reply: &Reply| reply.from == from).await?;

  reply
    .body
    .open::<R>()
    .map_err(|envelope| Fault::cast::<R>(&envelope))
}

/// Receives one request whose question is a `Q`, computes `handler`, and
/// replies to the requester.
///
/// Requests carrying other question types are left in the mailbox for
/// other receive operations.
///
/// # Errors
///
/// Surfaces a pending asynchronous fault, as with [`receive`].
///
/// [`receive`]: crate::receive
pub async fn respond<Q, R, F>(handler: F) -> Result<(), Fault>
where
  Q: Payload,
  R: Payload,
  F: FnOnce(Q) -> R,
{
  let me: Process = current();
  let request: Request = receive_match(|request: &Request| request.body.is::<Q>()).await?;
  let Request { from, body } = request;

  match body.open::<Q>() {
    Ok(question) => {
      from.send(Reply {
        from: me.pid(),
        body: Envelope::new(handler(question)),
      });

      Ok(())
    }
    // The filter above only admits requests containing a `Q`.
    Err(envelope) => Err(Fault::cast::<Q>(&envelope)),
  }
}
