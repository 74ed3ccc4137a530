// -----------------------------------------------------------------------------
// Process Spawning & Cleanup
// -----------------------------------------------------------------------------

use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::Weak;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task;
use tokio::time;

use crate::error::Fault;
use crate::lang::Envelope;
use crate::lang::Exit;
use crate::lang::Pid;
use crate::lang::RuntimeId;
use crate::proc::Died;
use crate::proc::Mailbox;
use crate::proc::ProcNode;
use crate::proc::ProcTask;
use crate::proc::Process;
use crate::proc::link;
use crate::proc::monitor;
use crate::proc::registry;
use crate::utils::CatchUnwind;

// -----------------------------------------------------------------------------
// Spawn
// -----------------------------------------------------------------------------

/// Observer registration performed between record insertion and body start.
#[derive(Clone, Copy, Debug)]
enum Observe {
  None,
  Link,
  Monitor,
}

/// Starts a new process running `action`.
///
/// The returned handle is live immediately. The body does not begin until
/// the process record is registered, so a crash at the first instruction
/// still has a record to clean up.
///
/// On termination the body's result is published as the process status:
/// `Ok(())` as a normal exit, `Err(fault)` or a panic as a fault.
///
/// # Panics
///
/// Panics when called from outside a Tokio runtime.
pub fn spawn<F>(action: F) -> Process
where
  F: Future<Output = Result<(), Fault>> + Send + 'static,
{
  spawn_observed(action, Observe::None)
}

/// Spawns a child and links the caller to it before the body runs.
///
/// Equivalent to [`spawn`] followed by [`link`], except that no gap exists
/// in which the child could die unobserved.
pub fn spawn_link<F>(action: F) -> Process
where
  F: Future<Output = Result<(), Fault>> + Send + 'static,
{
  spawn_observed(action, Observe::Link)
}

/// Spawns a child and monitors it before the body runs.
///
/// Equivalent to [`spawn`] followed by [`monitor`], except that no gap
/// exists in which the child could die unobserved.
pub fn spawn_monitor<F>(action: F) -> Process
where
  F: Future<Output = Result<(), Fault>> + Send + 'static,
{
  spawn_observed(action, Observe::Monitor)
}

/// Shared spawn implementation.
///
/// # Spawn Sequence
///
/// 1. Spawn the wrapper task, parked on a rendezvous channel
/// 2. Create the process record bound to the task's identity
/// 3. Register the record (the handle is now discoverable)
/// 4. Register the caller as link/monitor observer, if requested
/// 5. Complete the rendezvous, releasing the body
fn spawn_observed<F>(action: F, observe: Observe) -> Process
where
  F: Future<Output = Result<(), Fault>> + Send + 'static,
{
  let (started, handoff): (oneshot::Sender<ProcTask>, oneshot::Receiver<ProcTask>) =
    oneshot::channel();

  let handle: task::JoinHandle<()> = task::spawn(run_process(handoff, action));
  let node: Arc<ProcNode> = Arc::new(ProcNode::new(Pid::next(), RuntimeId::from_task(handle.id())));
  let process: Process = Process::new(Arc::clone(&node));

  registry::insert(process.clone());

  match observe {
    Observe::None => {}
    Observe::Link => link(&process),
    Observe::Monitor => monitor(&process),
  }

  tracing::debug!(pid = %process, "process spawned");

  if started.send(ProcTask::new(node)).is_err() {
    // The task is already gone (runtime shutdown); dropping the returned
    // ProcTask has published the abort status.
    tracing::debug!(pid = %process, "process task gone before start");
  }

  process
}

/// The spawned wrapper: rendezvous, run the body, publish the outcome.
async fn run_process<F>(handoff: oneshot::Receiver<ProcTask>, action: F)
where
  F: Future<Output = Result<(), Fault>> + Send + 'static,
{
  // The record is created and registered by the spawner; the body must not
  // start before that has happened.
  let Ok(task) = handoff.await else {
    return;
  };

  let node: Arc<ProcNode> = Arc::clone(&task.node);

  task
    .scope(async move {
      let body = CatchUnwind::new(action);

      tokio::pin!(body);

      let interrupted = interrupt_wait(&node);

      tokio::pin!(interrupted);

      let exit: Exit = tokio::select! {
        biased;
        // Asynchronous faults preempt the body at any await point.
        fault = &mut interrupted => Exit::Fault(fault),
        result = &mut body => match result {
          Ok(Ok(())) => Exit::Normal,
          Ok(Err(fault)) => Exit::Fault(fault),
          Err(fault) => Exit::Fault(fault),
        },
      };

      cleanup(&node, exit);
    })
    .await;
}

/// Resolves once an asynchronous fault is posted to `node`.
async fn interrupt_wait(node: &ProcNode) -> Fault {
  loop {
    let notified = node.notify.notified();

    tokio::pin!(notified);

    notified.as_mut().enable();

    {
      let mut guard = node.state.lock();

      if let Some(fault) = guard.interrupt.take() {
        return fault;
      }
    }

    notified.await;
  }
}

// -----------------------------------------------------------------------------
// Cleanup
// -----------------------------------------------------------------------------

/// The termination point of a process.
///
/// One critical section fills the status cell, snapshots and drains both
/// observer sets, and removes the registry entry; every concurrent
/// `link`/`monitor` call either lands in the snapshot or observes the
/// filled status and takes its already-dead branch. Notification fan-out
/// then runs without any lock held, so two peers dying simultaneously
/// notify each other without deadlock.
///
/// Runs at most once per process; later invocations (including the
/// `ProcTask` drop backstop) return immediately.
pub(crate) fn cleanup(node: &Arc<ProcNode>, exit: Exit) {
  let (links, monitors): (Vec<Weak<ProcNode>>, Vec<Weak<ProcNode>>) = {
    let mut guard = node.state.lock();

    if guard.status.is_some() {
      return;
    }

    guard.status = Some(exit.clone());
    guard.interrupt = None;

    let links: Vec<Weak<ProcNode>> = guard.links.drain().map(|(_, peer)| peer).collect();
    let monitors: Vec<Weak<ProcNode>> = guard.monitors.drain().map(|(_, peer)| peer).collect();

    // Undelivered messages have no consumer anymore; dropping them releases
    // any process handles they carry.
    guard.mailbox = Mailbox::new();

    registry::remove(node.rid, node.pid);

    (links, monitors)
  };

  node.notify.notify_waiters();

  let who: Process = Process::new(Arc::clone(node));
  let fault: Option<Fault> = exit.fault().cloned();

  tracing::debug!(pid = %who, %exit, "process terminated");

  for peer in monitors {
    if let Some(observer) = peer.upgrade() {
      observer.push(Envelope::new(Died {
        who: who.clone(),
        fault: fault.clone(),
      }));
    }
  }

  for peer in links {
    if let Some(observer) = peer.upgrade() {
      observer.post_interrupt(Fault::linked(who.clone(), fault.clone()));
    }
  }
}

// -----------------------------------------------------------------------------
// Scoped Processes
// -----------------------------------------------------------------------------

/// Kills the guarded child when dropped.
///
/// Covers every exit from the owning scope, including cancellation of the
/// surrounding task mid-`body`.
struct ScopeGuard {
  child: Process,
}

impl Drop for ScopeGuard {
  fn drop(&mut self) {
    self.child.kill(Fault::DependentActionEnded);
  }
}

/// Runs `body` against a child process executing `action`.
///
/// The child is stopped when `body` finishes, errors, or the surrounding
/// scope is cancelled: it receives [`Fault::DependentActionEnded`] as an
/// asynchronous exception, and on the non-cancelled paths this call also
/// waits for the child's termination before returning.
pub async fn with_process<F, B, Fut, R>(action: F, body: B) -> Result<R, Fault>
where
  F: Future<Output = Result<(), Fault>> + Send + 'static,
  B: FnOnce(Process) -> Fut,
  Fut: Future<Output = Result<R, Fault>>,
{
  let child: Process = spawn(action);
  let guard: ScopeGuard = ScopeGuard {
    child: child.clone(),
  };

  let result: Result<R, Fault> = body(child.clone()).await;

  drop(guard);

  child.wait().await;

  result
}

// -----------------------------------------------------------------------------
// Delayed Actions
// -----------------------------------------------------------------------------

/// Spawns a fire-and-forget activity that waits `delay`, then runs `f`.
///
/// Failure is routed back to the *caller*: if `f` returns an error or
/// panics, the calling process is killed with that fault.
pub fn delayed<F>(delay: Duration, f: F)
where
  F: FnOnce() -> Result<(), Fault> + Send + 'static,
{
  let caller: Process = registry::current();

  task::spawn(async move {
    time::sleep(delay).await;

    match panic::catch_unwind(AssertUnwindSafe(f)) {
      Ok(Ok(())) => {}
      Ok(Err(fault)) => caller.kill(fault),
      Err(payload) => caller.kill(Fault::panic(payload)),
    }
  });
}
