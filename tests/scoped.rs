mod common;

use std::time::Duration;
use tokio::time;

use common::boom;
use weft::Fault;
use weft::Process;
use weft::delayed;
use weft::receive;
use weft::spawn;
use weft::with_process;

#[tokio::test]
async fn scope_exit_stops_the_child() {
  let mut handle: Option<Process> = None;

  let result: Result<u64, Fault> = with_process(
    async {
      let _: i32 = receive().await?;

      Ok(())
    },
    |child| {
      handle = Some(child.clone());

      async move {
        assert!(child.is_running());

        Ok(99)
      }
    },
  )
  .await;

  assert_eq!(result.ok(), Some(99));

  let child: Process = handle.expect("child handle");
  let fault: Fault = child.wait().await.into_fault().expect("scoped stop");

  assert!(fault.is_dependent());
}

#[tokio::test]
async fn scope_error_still_stops_the_child() {
  let mut handle: Option<Process> = None;

  let result: Result<(), Fault> = with_process(
    async {
      let _: i32 = receive().await?;

      Ok(())
    },
    |child| {
      handle = Some(child);

      async { Err(boom("scope")) }
    },
  )
  .await;

  assert!(result.is_err());

  let child: Process = handle.expect("child handle");

  assert!(child.wait().await.into_fault().is_some_and(|fault| fault.is_dependent()));
}

#[tokio::test]
async fn delayed_failure_kills_the_caller() {
  let proc: Process = spawn(async {
    delayed(Duration::from_millis(10), || Err(boom("timer")));

    let _: i32 = receive().await?;

    Ok(())
  });

  let fault: Fault = proc.wait().await.into_fault().expect("timer fault");

  assert!(fault.to_string().contains("timer"));
}

#[tokio::test]
async fn delayed_success_leaves_the_caller_alone() {
  let proc: Process = spawn(async {
    delayed(Duration::from_millis(10), || Ok(()));

    time::sleep(Duration::from_millis(50)).await;

    Ok(())
  });

  assert!(proc.wait().await.is_normal());
}
