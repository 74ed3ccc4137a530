mod common;

use std::time::Duration;
use tokio::time;

use common::boom;
use weft::Fault;
use weft::Process;
use weft::Stop;
use weft::current;
use weft::processes;
use weft::receive;
use weft::spawn;

#[tokio::test]
async fn normal_exit_publishes_status() {
  let proc: Process = spawn(async { Ok(()) });

  assert!(proc.wait().await.is_normal());
  assert!(!proc.is_running());
  assert!(proc.fault().is_none());
}

#[tokio::test]
async fn faulted_exit_stores_the_fault() {
  let proc: Process = spawn(async { Err(boom("worker")) });

  assert!(proc.wait().await.is_fault());

  let fault: Fault = proc.fault().expect("fault stored");

  assert!(fault.is_app());
  assert!(fault.to_string().contains("worker"));
}

#[tokio::test]
async fn panics_become_faults() {
  let proc: Process = spawn(async { panic!("kaput") });
  let fault: Fault = proc.wait().await.into_fault().expect("panic fault");

  assert!(fault.is_panic());
  assert_eq!(fault.to_string(), "panic: kaput");
}

#[tokio::test]
async fn kill_preempts_a_suspended_body() {
  let proc: Process = spawn(async {
    let _: i32 = receive().await?;

    Ok(())
  });

  assert!(proc.is_running());

  proc.kill(Fault::DependentActionEnded);

  let fault: Fault = proc.wait().await.into_fault().expect("killed");

  assert!(fault.is_dependent());
}

#[tokio::test]
async fn killing_the_dead_is_a_no_op() {
  let proc: Process = spawn(async { Ok(()) });

  proc.wait().await;
  proc.kill(boom("too late"));

  assert!(proc.fault().is_none());
}

#[tokio::test]
async fn stop_is_cooperative() {
  let proc: Process = spawn(async {
    let stop: Stop = receive().await?;

    assert!(stop.from.pid().as_u64() > 0);

    Ok(())
  });

  proc.stop();

  assert!(proc.wait().await.is_normal());
}

#[tokio::test]
async fn sends_to_the_dead_are_discarded() {
  let proc: Process = spawn(async { Ok(()) });

  proc.wait().await;
  proc.send(7_i32);

  assert!(proc.fault().is_none());
}

#[tokio::test]
async fn foreign_tasks_are_adopted_once() {
  let first: Process = current();
  let second: Process = current();

  assert_eq!(first, second);
  assert!(processes().contains(&first));
}

#[tokio::test]
async fn handles_order_by_identity() {
  let a: Process = spawn(async { Ok(()) });
  let b: Process = spawn(async { Ok(()) });

  assert_ne!(a, b);
  assert_ne!(a.pid(), b.pid());
  assert_eq!(a < b, a.pid() < b.pid());
  assert_eq!(a.clone(), a);

  a.wait().await;
  b.wait().await;
}

#[tokio::test]
async fn many_waiters_observe_one_exit() {
  let proc: Process = spawn(async {
    time::sleep(Duration::from_millis(20)).await;

    Ok(())
  });

  let w1: Process = proc.clone();
  let w2: Process = proc.clone();

  let h1 = tokio::spawn(async move { w1.wait().await.is_normal() });
  let h2 = tokio::spawn(async move { w2.wait().await.is_normal() });

  assert!(h1.await.expect("waiter one"));
  assert!(h2.await.expect("waiter two"));
}
