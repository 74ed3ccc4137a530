mod common;

use std::sync::Arc;
use std::sync::Mutex;

use common::boom;
use weft::Died;
use weft::Fault;
use weft::Process;
use weft::Strategy;
use weft::Supervisor;
use weft::current;
use weft::monitor;
use weft::receive;
use weft::spawn;

struct Go;

#[tokio::test]
async fn ignore_graceful_propagates_faults() {
  common::init_tracing();

  let sup: Supervisor = Supervisor::start(Strategy::IgnoreGraceful);

  let c1: Process = sup.add_child(async { Ok(()) }).await.expect("c1");

  assert!(c1.wait().await.is_normal());

  let c2: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Err(boom("c2"))
    })
    .await
    .expect("c2");

  let c3: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Ok(())
    })
    .await
    .expect("c3");

  c2.send(Go);

  let fault: Fault = sup.process().wait().await.into_fault().expect("propagated");

  assert!(fault.to_string().contains("c2"));
  assert!(c3.wait().await.into_fault().is_some_and(|fault| fault.is_dependent()));
}

#[tokio::test]
async fn notify_runs_once_per_termination_in_order() {
  common::init_tracing();

  let seen: Arc<Mutex<Vec<(u64, bool)>>> = Arc::new(Mutex::new(Vec::new()));
  let me: Process = current();

  let recorder = {
    let seen = Arc::clone(&seen);

    move |child: &Process, fault: Option<&Fault>| {
      seen.lock().expect("seen lock").push((child.pid().as_u64(), fault.is_some()));
      me.send(Go);

      Ok(())
    }
  };

  let sup: Supervisor = Supervisor::start(Strategy::notify(recorder));

  let c1: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Ok(())
    })
    .await
    .expect("c1");

  let c2: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Err(boom("two"))
    })
    .await
    .expect("c2");

  let c3: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      panic!("three")
    })
    .await
    .expect("c3");

  // Release the children one at a time, waiting for the callback's ack, so
  // the recorded order is the termination order.
  for child in [&c1, &c2, &c3] {
    child.send(Go);

    let _: Go = receive().await.expect("notify ack");
  }

  let recorded: Vec<(u64, bool)> = seen.lock().expect("seen lock").clone();

  assert_eq!(
    recorded,
    vec![
      (c1.pid().as_u64(), false),
      (c2.pid().as_u64(), true),
      (c3.pid().as_u64(), true),
    ]
  );

  assert!(sup.process().is_running());

  sup.stop();

  assert!(sup.process().wait().await.is_normal());
}

#[tokio::test]
async fn kill_all_cancels_the_survivors() {
  common::init_tracing();

  let sup: Supervisor = Supervisor::start(Strategy::KillAll);

  let worker: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Ok(())
    })
    .await
    .expect("worker");

  let crasher: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Err(boom("crash"))
    })
    .await
    .expect("crasher");

  crasher.send(Go);

  let fault: Fault = sup.process().wait().await.into_fault().expect("propagated");

  assert!(fault.to_string().contains("crash"));
  assert!(worker.wait().await.into_fault().is_some_and(|fault| fault.is_dependent()));
}

#[tokio::test]
async fn kill_all_exits_normally_after_clean_child() {
  common::init_tracing();

  let sup: Supervisor = Supervisor::start(Strategy::KillAll);

  let worker: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Ok(())
    })
    .await
    .expect("worker");

  let _clean: Process = sup.add_child(async { Ok(()) }).await.expect("clean");

  assert!(sup.process().wait().await.is_normal());
  assert!(worker.wait().await.into_fault().is_some_and(|fault| fault.is_dependent()));
}

#[tokio::test]
async fn ignore_all_shrugs_at_faults() {
  common::init_tracing();

  let sup: Supervisor = Supervisor::start(Strategy::IgnoreAll);

  let crasher: Process = sup.add_child(async { Err(boom("meh")) }).await.expect("crasher");

  crasher.wait().await;

  let after: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Ok(())
    })
    .await
    .expect("still serving");

  drop(after);
  sup.stop();

  assert!(sup.process().wait().await.is_normal());
}

#[tokio::test]
async fn remove_child_cancels_without_strategy() {
  common::init_tracing();

  let sup: Supervisor = Supervisor::start(Strategy::IgnoreGraceful);

  let worker: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Ok(())
    })
    .await
    .expect("worker");

  sup.remove_child(&worker);

  assert!(worker.wait().await.into_fault().is_some_and(|fault| fault.is_dependent()));

  // The removed child died with a fault, but removal demonitored it first,
  // so the graceful strategy must not trip.
  let after: Process = sup.add_child(async { Ok(()) }).await.expect("survived removal");

  drop(after);
  sup.stop();

  assert!(sup.process().wait().await.is_normal());
}

#[tokio::test]
async fn stop_cancels_every_child() {
  common::init_tracing();

  let sup: Supervisor = Supervisor::start(Strategy::IgnoreAll);

  let w1: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Ok(())
    })
    .await
    .expect("w1");

  let w2: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Ok(())
    })
    .await
    .expect("w2");

  sup.stop();

  assert!(sup.process().wait().await.is_normal());
  assert!(w1.wait().await.into_fault().is_some_and(|fault| fault.is_dependent()));
  assert!(w2.wait().await.into_fault().is_some_and(|fault| fault.is_dependent()));
}

#[tokio::test]
async fn killing_the_supervisor_scrubs_its_children() {
  common::init_tracing();

  let sup: Supervisor = Supervisor::start(Strategy::IgnoreAll);

  let worker: Process = sup
    .add_child(async {
      let _: Go = receive().await?;

      Ok(())
    })
    .await
    .expect("worker");

  sup.process().kill(boom("ops"));

  assert!(sup.process().wait().await.into_fault().is_some_and(|fault| fault.is_app()));
  assert!(worker.wait().await.into_fault().is_some_and(|fault| fault.is_dependent()));
}

#[tokio::test]
async fn a_supervisor_can_be_monitored() {
  common::init_tracing();

  let sup: Supervisor = Supervisor::start(Strategy::IgnoreAll);

  let watcher: Process = spawn({
    let target = sup.process().clone();

    async move {
      monitor(&target);

      let died: Died = receive().await?;

      assert!(died.fault.is_none());

      Ok(())
    }
  });

  sup.stop();

  assert!(watcher.wait().await.is_normal());
}
