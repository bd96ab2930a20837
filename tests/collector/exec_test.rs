//! Host command execution tests.

use std::time::Duration;

use suspend_doctor::collector::{CollectError, CommandRunner, ExecOptions, ExecResult, ProcessRunner};

fn result(exit_code: Option<i32>, timed_out: bool) -> ExecResult {
    ExecResult {
        exit_code,
        stdout: String::new(),
        stderr: String::new(),
        timed_out,
        duration: Duration::ZERO,
    }
}

#[test]
fn success_requires_zero_exit_and_no_timeout() {
    assert!(result(Some(0), false).success());
    assert!(!result(Some(1), false).success());
    assert!(!result(None, true).success());
    assert!(!result(None, false).success());
}

#[test]
fn default_timeout_is_sixty_seconds() {
    assert_eq!(ExecOptions::default().timeout, Duration::from_secs(60));
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let outcome = ProcessRunner
        .run(
            "/nonexistent/suspend-doctor-adb",
            &["shell".to_owned()],
            &ExecOptions::default(),
        )
        .await;
    assert!(matches!(outcome, Err(CollectError::Spawn { .. })));
}

#[cfg(unix)]
#[tokio::test]
async fn captures_stdout_and_exit_code() {
    let args = vec!["-c".to_owned(), "echo captured; exit 3".to_owned()];
    let outcome = ProcessRunner
        .run("sh", &args, &ExecOptions::default())
        .await
        .expect("sh should run");
    assert_eq!(outcome.stdout, "captured\n");
    assert_eq!(outcome.exit_code, Some(3));
    assert!(!outcome.timed_out);
}

#[cfg(unix)]
#[tokio::test]
async fn slow_command_times_out() {
    let args = vec!["-c".to_owned(), "sleep 5".to_owned()];
    let opts = ExecOptions {
        timeout: Duration::from_millis(100),
    };
    let outcome = ProcessRunner
        .run("sh", &args, &opts)
        .await
        .expect("sh should run");
    assert!(outcome.timed_out);
    assert!(!outcome.success());
}
