use weft::Dispatch;
use weft::Fault;
use weft::Process;
use weft::Stop;
use weft::query;
use weft::respond;
use weft::spawn;

#[derive(Debug, PartialEq)]
struct Ping;

#[derive(Debug, PartialEq)]
struct Pong;

#[tokio::test]
async fn query_round_trip() {
  let responder: Process = spawn(async {
    respond(|_: Ping| Pong).await?;

    Ok(())
  });

  let answer: Pong = query(Ping, &responder).await.expect("pong");

  assert_eq!(answer, Pong);
  assert!(responder.wait().await.is_normal());
}

#[tokio::test]
async fn concurrent_queries_each_get_their_own_answer() {
  let responder: Process = spawn(async {
    for _ in 0..2 {
      respond(|value: i32| value * 2).await?;
    }

    Ok(())
  });

  let r1: Process = responder.clone();
  let r2: Process = responder.clone();

  let c1: Process = spawn(async move {
    let doubled: i32 = query(21_i32, &r1).await?;

    assert_eq!(doubled, 42);

    Ok(())
  });

  let c2: Process = spawn(async move {
    let doubled: i32 = query(100_i32, &r2).await?;

    assert_eq!(doubled, 200);

    Ok(())
  });

  assert!(c1.wait().await.is_normal());
  assert!(c2.wait().await.is_normal());
  assert!(responder.wait().await.is_normal());
}

#[tokio::test]
async fn mistyped_reply_is_a_cast_fault() {
  let responder: Process = spawn(async {
    respond(|_: Ping| String::from("not a pong")).await?;

    Ok(())
  });

  let answer: Result<Pong, Fault> = query(Ping, &responder).await;
  let fault: Fault = answer.expect_err("cast must fail");

  assert!(fault.is_cast());
  assert!(responder.wait().await.is_normal());
}

#[tokio::test]
async fn dispatch_query_arm_replies() {
  let responder: Process = spawn(async {
    loop {
      let stop: bool = Dispatch::new()
        .query(|value: i32| value + 1)
        .case(|_: Stop| true)
        .run()
        .await?;

      if stop {
        return Ok(());
      }
    }
  });

  let answer: i32 = query(41_i32, &responder).await.expect("reply");

  assert_eq!(answer, 42);

  responder.stop();

  assert!(responder.wait().await.is_normal());
}
