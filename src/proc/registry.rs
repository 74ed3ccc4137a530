use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use std::sync::Arc;
use std::sync::LazyLock;

use crate::consts::CAP_REGISTRY;
use crate::lang::Pid;
use crate::lang::RuntimeId;
use crate::proc::ProcNode;
use crate::proc::ProcTask;
use crate::proc::Process;

// A table mapping host activity identifiers to live processes.
static REGISTERED_PROCS: LazyLock<RwLock<HashMap<RuntimeId, Process>>> =
  LazyLock::new(|| RwLock::new(HashMap::with_capacity(CAP_REGISTRY)));

// -----------------------------------------------------------------------------
// Current Process
// -----------------------------------------------------------------------------

/// Returns the process of the calling activity.
///
/// Processes started via [`spawn`] resolve through their task-local
/// context. Any other activity (a plain Tokio task, a `block_on` future,
/// a bare thread) is adopted on first use: a fresh record (empty mailbox,
/// no observers, no status) is bound to its identity and registered. The
/// runtime cannot observe a foreign activity's end, so an adopted record
/// stays registered until it is explicitly terminated.
///
/// [`spawn`]: crate::spawn
pub fn current() -> Process {
  let context: Option<Process> =
    ProcTask::try_with(|task| Process::new(Arc::clone(&task.node)));

  match context {
    Some(process) => process,
    None => lookup_or_create(RuntimeId::current()),
  }
}

/// Returns the registered process for `rid`, creating and registering one
/// in the same write transaction if the activity is unknown.
pub(crate) fn lookup_or_create(rid: RuntimeId) -> Process {
  let mut guard: RwLockWriteGuard<'_, HashMap<RuntimeId, Process>> = REGISTERED_PROCS.write();

  match guard.entry(rid) {
    Entry::Occupied(entry) => entry.get().clone(),
    Entry::Vacant(entry) => {
      let node: Arc<ProcNode> = Arc::new(ProcNode::new(Pid::next(), rid));
      let process: Process = Process::new(node);

      entry.insert(process.clone());

      tracing::debug!(pid = %process, %rid, "process adopted");

      process
    }
  }
}

// -----------------------------------------------------------------------------
// Table Maintenance
// -----------------------------------------------------------------------------

/// Registers a freshly spawned process.
pub(crate) fn insert(process: Process) {
  let rid: RuntimeId = process.node.rid;

  if REGISTERED_PROCS.write().insert(rid, process).is_some() {
    // Host task identifiers can be reused once a task completes; a record
    // left behind by an adopted task is displaced here.
    tracing::warn!(%rid, "displaced stale process entry");
  }
}

/// Removes a terminated process. Invoked only by cleanup, inside the dying
/// process's state lock, so status fill and deregistration are observed as
/// one step.
///
/// The entry is only removed when it still belongs to `pid`: a reused task
/// identifier may already carry a younger process.
pub(crate) fn remove(rid: RuntimeId, pid: Pid) {
  let mut guard: RwLockWriteGuard<'_, HashMap<RuntimeId, Process>> = REGISTERED_PROCS.write();

  match guard.get(&rid) {
    Some(process) if process.pid() == pid => {
      guard.remove(&rid);
    }
    Some(_) => {
      tracing::warn!(%rid, %pid, "skipped removal of displaced entry");
    }
    None => {
      tracing::error!(%rid, %pid, "dangling process removal");
    }
  }

  drop(guard);
}

// -----------------------------------------------------------------------------
// Introspection
// -----------------------------------------------------------------------------

/// Returns a snapshot of all live registered processes.
pub fn processes() -> Vec<Process> {
  let guard: RwLockReadGuard<'_, HashMap<RuntimeId, Process>> = REGISTERED_PROCS.read();
  let value: Vec<Process> = guard.values().cloned().collect();

  drop(guard);

  value
}
