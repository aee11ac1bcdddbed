//! Graceful shutdown: drain within the grace period or fail.

use std::time::{Duration, Instant};

use axum::{routing::get, Router};
use probe_service::server::{Phase, Server};
use probe_service::utils::ShutdownToken;
use probe_service::ServiceError;

/// Router with a single handler that sleeps for `delay`.
fn slow_router(delay: Duration) -> Router {
    Router::new().route(
        "/slow",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "done"
        }),
    )
}

#[tokio::test]
async fn in_flight_request_drains_before_stop() {
    let server = Server::bind(
        ([127, 0, 0, 1], 0).into(),
        slow_router(Duration::from_millis(200)),
        Duration::from_secs(5),
    )
    .await
    .unwrap();
    let addr = server.local_addr().unwrap();
    let token = ShutdownToken::new();
    let run = tokio::spawn(server.run(token.clone()));

    let request = tokio::spawn(reqwest::get(format!("http://{addr}/slow")));
    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let response = request.await.unwrap().unwrap();
    assert_eq!(response.text().await.unwrap(), "done");
    assert!(run.await.unwrap().is_ok());
}

#[tokio::test]
async fn drain_past_grace_period_is_a_timeout() {
    let grace = Duration::from_millis(100);
    let server = Server::bind(
        ([127, 0, 0, 1], 0).into(),
        slow_router(Duration::from_secs(10)),
        grace,
    )
    .await
    .unwrap();
    let addr = server.local_addr().unwrap();
    let mut phase = server.phase();
    let token = ShutdownToken::new();
    let run = tokio::spawn(server.run(token.clone()));

    let _request = tokio::spawn(reqwest::get(format!("http://{addr}/slow")));
    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let started = Instant::now();
    let result = run.await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(
        matches!(result, Err(ServiceError::ShutdownTimeout { grace: g }) if g == grace),
        "{result:?}"
    );
    assert_eq!(*phase.borrow_and_update(), Phase::Stopped);
}

#[cfg(unix)]
#[test]
fn sigterm_exits_cleanly() {
    use std::io::{BufRead, BufReader};
    use std::process::{Command, Stdio};

    let mut child = Command::new(env!("CARGO_BIN_EXE_probe-service"))
        .args(["--addr", "127.0.0.1:0"])
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn probe-service");

    let stdout = child.stdout.take().unwrap();
    let mut lines = BufReader::new(stdout).lines();
    let listening = lines
        .by_ref()
        .map_while(Result::ok)
        .any(|line| line.contains("listening"));
    assert!(listening, "server never reported listening");

    let status = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .expect("run kill");
    assert!(status.success());

    // Keep the pipe drained so logging never blocks the child.
    std::thread::spawn(move || lines.for_each(drop));

    let deadline = Instant::now() + Duration::from_secs(5);
    let exit = loop {
        if let Some(exit) = child.try_wait().unwrap() {
            break exit;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("process did not exit within 5s of SIGTERM");
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    assert!(exit.success(), "exit status {exit:?}");
}

#[test]
fn bind_failure_exits_non_zero() {
    use std::net::TcpListener;
    use std::process::{Command, Stdio};

    let held = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = held.local_addr().unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_probe-service"))
        .args(["--addr", &addr.to_string()])
        .env("RUST_LOG", "info")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn probe-service");

    let deadline = Instant::now() + Duration::from_secs(5);
    let exit = loop {
        if let Some(exit) = child.try_wait().unwrap() {
            break exit;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("process kept running on an occupied address");
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    assert!(!exit.success(), "exit status {exit:?}");
    drop(held);
}
