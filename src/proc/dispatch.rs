use std::sync::Arc;

use crate::error::Fault;
use crate::lang::Envelope;
use crate::lang::Payload;
use crate::proc::ProcNode;
use crate::proc::Process;
use crate::proc::Reply;
use crate::proc::Request;
use crate::proc::current;
use crate::proc::receive_dyn;

// -----------------------------------------------------------------------------
// Handler
// -----------------------------------------------------------------------------

/// One prepared arm: a reusable matcher plus a single-shot action.
///
/// The matcher runs against every candidate message; the action runs once,
/// on the message the matcher accepted.
struct Handler<'a, R> {
  accepts: Box<dyn FnMut(&Envelope) -> bool + Send + 'a>,
  consume: Box<dyn FnOnce(Envelope) -> Result<R, Fault> + Send + 'a>,
}

// -----------------------------------------------------------------------------
// Dispatch
// -----------------------------------------------------------------------------

/// An ordered multi-pattern receive.
///
/// Arms are tried in registration order against each queued message; the
/// first message any arm accepts is consumed and its arm produces the
/// result. Everything else keeps its mailbox slot, in order, exactly as
/// with [`receive_match`].
///
/// ```no_run
/// # use weft::{Dispatch, Fault, Stop};
/// # async fn step(counter: &mut u64) -> Result<bool, Fault> {
/// Dispatch::new()
///   .case(|tick: u64| {
///     *counter += tick;
///     true
///   })
///   .case(|_: Stop| false)
///   .run()
///   .await
/// # }
/// ```
///
/// [`receive_match`]: crate::receive_match
pub struct Dispatch<'a, R> {
  handlers: Vec<Handler<'a, R>>,
}

impl<'a, R> Dispatch<'a, R> {
  /// Creates an empty dispatcher.
  pub fn new() -> Self {
    Self {
      handlers: Vec::new(),
    }
  }

  /// Adds an arm matching any message of type `T`.
  pub fn case<T, F>(self, action: F) -> Self
  where
    T: Payload,
    F: FnOnce(T) -> R + Send + 'a,
  {
    self.case_match(|_: &T| true, action)
  }

  /// Adds an arm matching messages of type `T` accepted by `pred`.
  pub fn case_match<T, P, F>(mut self, mut pred: P, action: F) -> Self
  where
    T: Payload,
    P: FnMut(&T) -> bool + Send + 'a,
    F: FnOnce(T) -> R + Send + 'a,
  {
    self.handlers.push(Handler {
      accepts: Box::new(move |envelope| {
        envelope.peek::<T>().is_some_and(|message| pred(message))
      }),
      consume: Box::new(move |envelope| match envelope.open::<T>() {
        Ok(message) => Ok(action(message)),
        Err(envelope) => Err(Fault::cast::<T>(&envelope)),
      }),
    });

    self
  }

  /// Adds an arm matching queries whose question is a `Q`.
  ///
  /// On a match the arm computes `action(question)` and replies to the
  /// requester; the dispatch result is `R::default()`.
  pub fn query<Q, S, F>(mut self, action: F) -> Self
  where
    R: Default,
    Q: Payload,
    S: Payload,
    F: FnOnce(Q) -> S + Send + 'a,
  {
    self.handlers.push(Handler {
      accepts: Box::new(|envelope| {
        envelope
          .peek::<Request>()
          .is_some_and(|request| request.body.is::<Q>())
      }),
      consume: Box::new(move |envelope| {
        let request: Request = envelope
          .open::<Request>()
          .map_err(|envelope| Fault::cast::<Request>(&envelope))?;

        let Request { from, body } = request;
        let question: Q = body.open::<Q>().map_err(|envelope| Fault::cast::<Q>(&envelope))?;
        let me: Process = current();

        from.send(Reply {
          from: me.pid(),
          body: Envelope::new(action(question)),
        });

        Ok(R::default())
      }),
    });

    self
  }

  /// Adds an arm matching any message. Only useful as the last arm.
  pub fn case_default<F>(mut self, action: F) -> Self
  where
    F: FnOnce(Envelope) -> R + Send + 'a,
  {
    self.handlers.push(Handler {
      accepts: Box::new(|_| true),
      consume: Box::new(move |envelope| Ok(action(envelope))),
    });

    self
  }

  /// Receives exactly one message through the arm table.
  ///
  /// Suspends while no queued message matches any arm.
  ///
  /// # Errors
  ///
  /// Surfaces a pending asynchronous fault, as with [`receive`].
  ///
  /// [`receive`]: crate::receive
  pub async fn run(mut self) -> Result<R, Fault> {
    let node: Arc<ProcNode> = current().node;
    let mut selected: Option<usize> = None;

    let envelope: Envelope = receive_dyn(&node, |envelope| {
      for (index, handler) in self.handlers.iter_mut().enumerate() {
        if (handler.accepts)(envelope) {
          selected = Some(index);
          return true;
        }
      }

      false
    })
    .await?;

    let Some(index) = selected else {
      // The filter only accepts after recording the matching arm.
      unreachable!("dispatch accepted a message without recording an arm");
    };

    let handler: Handler<'a, R> = self.handlers.swap_remove(index);

    (handler.consume)(envelope)
  }
}

impl<R> Default for Dispatch<'_, R> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
