use parking_lot::Mutex;
use parking_lot::MutexGuard;
use std::pin::Pin;

use crate::error::Fault;
use crate::proc::Died;
use crate::proc::Dispatch;
use crate::proc::Process;
use crate::proc::demonitor;
use crate::proc::monitor;
use crate::proc::query;
use crate::proc::spawn;
use crate::sup::Children;
use crate::sup::Strategy;

/// A boxed child body, transferable through the control mailbox.
type Action = Pin<Box<dyn Future<Output = Result<(), Fault>> + Send>>;

// -----------------------------------------------------------------------------
// Control Messages
// -----------------------------------------------------------------------------

/// Start a child; replied with its handle.
struct AddChild {
  action: Action,
}

/// Deregister and cancel a child.
struct RemoveChild {
  child: Process,
}

/// Cancel all children and exit normally.
struct StopSupervisor;

// -----------------------------------------------------------------------------
// Supervisor
// -----------------------------------------------------------------------------

/// A handle to a running supervisor.
///
/// The supervisor is an ordinary process: its control inbox is its own
/// mailbox, and child termination reaches it as [`Died`] messages because
/// it monitors every child it starts. It can itself be linked, monitored,
/// killed, and supervised.
#[derive(Clone)]
pub struct Supervisor {
  proc: Process,
}

impl Supervisor {
  /// Starts a supervisor applying `strategy` to child terminations.
  pub fn start(strategy: Strategy) -> Self {
    let proc: Process = spawn(async move { supervise(strategy).await });

    Self { proc }
  }

  /// Returns the supervisor's own process.
  #[inline]
  pub fn process(&self) -> &Process {
    &self.proc
  }

  /// Starts a new child under this supervisor and returns its handle.
  ///
  /// # Errors
  ///
  /// Surfaces a pending asynchronous fault of the *calling* process. A
  /// supervisor that has already terminated never replies, which suspends
  /// this call indefinitely.
  pub async fn add_child<F>(&self, action: F) -> Result<Process, Fault>
  where
    F: Future<Output = Result<(), Fault>> + Send + 'static,
  {
    let action: Action = Box::pin(action);

    query(AddChild { action }, &self.proc).await
  }

  /// Deregisters `child` and cancels it.
  ///
  /// Asynchronous: the removal takes effect when the supervisor processes
  /// the message. Unknown children are ignored.
  pub fn remove_child(&self, child: &Process) {
    self.proc.send(RemoveChild {
      child: child.clone(),
    });
  }

  /// Stops the supervisor.
  ///
  /// Asynchronous: once processed, all children are cancelled and the
  /// supervisor process exits normally.
  pub fn stop(&self) {
    self.proc.send(StopSupervisor);
  }
}

// -----------------------------------------------------------------------------
// Main Loop
// -----------------------------------------------------------------------------

/// One loop step outcome.
#[derive(Default)]
enum Tick {
  #[default]
  Continue,
  Stop,
  Fail(Fault),
}

/// The supervisor body: one event per iteration, control messages and
/// child-termination notices fairly merged through the mailbox.
async fn supervise(strategy: Strategy) -> Result<(), Fault> {
  // Shared with the dispatch arms; dropping it cancels every remaining
  // child, covering faulted exits and external cancellation alike.
  let children: Mutex<Children> = Mutex::new(Children::new());

  loop {
    let tick: Tick = Dispatch::new()
      .query(|request: AddChild| {
        let child: Process = spawn(request.action);

        monitor(&child);
        children.lock().insert(child.clone());

        tracing::debug!(%child, "supervisor added child");

        child
      })
      .case(|request: RemoveChild| {
        if let Some(child) = children.lock().remove(request.child.pid()) {
          demonitor(&child);
          child.kill(Fault::DependentActionEnded);

          tracing::debug!(%child, "supervisor removed child");
        }

        Tick::Continue
      })
      .case(|_: StopSupervisor| Tick::Stop)
      .case(|died: Died| {
        let mut live: MutexGuard<'_, Children> = children.lock();

        let Some(child) = live.remove(died.who.pid()) else {
          // Not ours: the child raced a removal or a previous fan-out.
          return Tick::Continue;
        };

        tracing::debug!(%child, fault = ?died.fault, "supervisor observed termination");

        apply(&strategy, &mut live, &child, died.fault)
      })
      .run()
      .await?;

    match tick {
      Tick::Continue => {}
      Tick::Stop => {
        children.lock().cancel_all();

        return Ok(());
      }
      Tick::Fail(fault) => {
        children.lock().cancel_all();

        return Err(fault);
      }
    }
  }
}

/// Applies the supervision strategy to one child termination.
fn apply(
  strategy: &Strategy,
  children: &mut Children,
  child: &Process,
  fault: Option<Fault>,
) -> Tick {
  match strategy {
    Strategy::IgnoreAll => Tick::Continue,
    Strategy::IgnoreGraceful => match fault {
      None => Tick::Continue,
      Some(fault) => {
        children.cancel_all();

        Tick::Fail(fault)
      }
    },
    Strategy::KillAll => {
      children.cancel_all();

      match fault {
        Some(fault) => Tick::Fail(fault),
        None => Tick::Stop,
      }
    }
    Strategy::Notify(callback) => match callback(child, fault.as_ref()) {
      Ok(()) => Tick::Continue,
      Err(error) => {
        children.cancel_all();

        Tick::Fail(error)
      }
    },
  }
}
