#![cfg(all(test, unix))]
use std::time::{Duration, Instant};

use hoppr_common::config::Config;
use hoppr_common::error::RunError;
use hoppr_common::host::Host;
use hoppr_common::process::{Capture, Completion, Invocation};
use hoppr_common::tracer::Tracer;
use hoppr_core::report::Report;
use hoppr_core::runner::{self, ProcessTracer};

const GENEROUS: Duration = Duration::from_secs(10);

fn sh(script: &str) -> Invocation {
    Invocation::new("sh", ["-c", script])
}

async fn run(script: &str, limit: Duration, reap_limit: Duration) -> Capture {
    runner::run_with_timeout(&sh(script), limit, reap_limit)
        .await
        .expect("sh should always be spawnable")
}

fn host() -> Host {
    "example.com".parse().unwrap()
}

/// A clean run with two hop lines produces a two-hop report.
#[tokio::test]
async fn clean_run_counts_hops() {
    let capture = run(
        "printf '1  router.local  1.2 ms\\n2  10.0.0.1  3.4 ms\\n'",
        GENEROUS,
        GENEROUS,
    )
    .await;

    assert_eq!(capture.completion, Completion::Exited { code: Some(0) });
    assert_eq!(capture.stdout, "1  router.local  1.2 ms\n2  10.0.0.1  3.4 ms");
    assert_eq!(capture.stderr, "");

    let report = Report::from_capture(&host(), &capture);
    assert_eq!(
        report.lines(),
        [
            "Output:",
            "1  router.local  1.2 ms",
            "2  10.0.0.1  3.4 ms",
            "",
            "Summary - 2 hops to destination (example.com)",
        ]
    );
}

#[tokio::test]
async fn stderr_is_captured_and_collapsed() {
    let capture = run("echo 'unknown host' >&2; exit 2", GENEROUS, GENEROUS).await;

    assert_eq!(capture.completion, Completion::Exited { code: Some(2) });
    assert_eq!(capture.stderr, "unknown host");
    assert_eq!(Report::from_capture(&host(), &capture), Report::HostUnknown);
}

/// The child is killed at the timeout and output written before it survives.
#[tokio::test]
async fn timeout_kills_and_keeps_partial_output() {
    let started = Instant::now();
    let capture = run(
        "echo ' 1  gw  0.4 ms'; exec sleep 30",
        Duration::from_millis(500),
        Duration::from_secs(5),
    )
    .await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(capture.completion, Completion::TimedOut { reaped: true });
    assert_eq!(capture.stdout, "1  gw  0.4 ms");

    let report = Report::from_capture(&host(), &capture);
    assert!(matches!(report, Report::Route { hops: 1, .. }));
}

#[tokio::test]
async fn timeout_with_no_output_reports_zero_hops() {
    let capture = run("exec sleep 30", Duration::from_millis(200), Duration::from_secs(5)).await;

    assert!(capture.completion.timed_out());
    assert_eq!(
        Report::from_capture(&host(), &capture).lines().last().unwrap(),
        "Summary - 0 hops to destination (example.com)"
    );
}

/// A grandchild holding the pipes open must not hang the run after the kill.
#[tokio::test]
async fn reap_is_bounded_when_grandchild_holds_pipes() {
    let started = Instant::now();
    let capture = run(
        "echo ' 1  gw  0.4 ms'; sleep 20; echo never",
        Duration::from_millis(300),
        Duration::from_millis(300),
    )
    .await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(capture.completion.timed_out());
    assert_eq!(capture.stdout, "1  gw  0.4 ms");
}

#[tokio::test]
async fn missing_tool_is_reported_as_not_found() {
    let mut cfg = Config::new(host());
    cfg.program = "/nonexistent/hoppr/traceroute".to_string();

    let result = ProcessTracer.trace(&cfg).await;

    assert!(matches!(result, Err(RunError::NotFound { .. })));
}

#[tokio::test]
async fn signalled_child_is_abnormal() {
    let capture = run("kill -9 $$", GENEROUS, GENEROUS).await;

    assert!(capture.completion.terminated_abnormally());
}
