#![cfg(unix)]

use blogsheet_server::{ExitState, ProcessWorker, ScrapeWorker};

#[tokio::test]
async fn reports_exit_code_and_line_counts() {
    let worker = ProcessWorker::new("sh").with_args([
        "-c",
        "echo \"scraping $1\"; echo done; echo 'warn: slow page' >&2; exit 3",
        "scrape",
    ]);

    let outcome = worker.run("pymes").await.unwrap();
    assert_eq!(outcome.exit, ExitState::Code(3));
    assert!(!outcome.exit.success());
    assert_eq!(outcome.stdout_lines, 2);
    assert_eq!(outcome.stderr_lines, 1);
}

#[tokio::test]
async fn clean_exit_is_success() {
    let worker = ProcessWorker::new("sh").with_args(["-c", "test \"$1\" = all", "scrape"]);
    let outcome = worker.run("all").await.unwrap();
    assert!(outcome.exit.success());
    assert_eq!(outcome.stdout_lines, 0);
}

#[tokio::test]
async fn signal_termination_has_no_code() {
    let worker = ProcessWorker::new("sh").with_args(["-c", "kill -9 $$", "scrape"]);
    let outcome = worker.run("pymes").await.unwrap();
    assert_eq!(outcome.exit, ExitState::Signal);
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let worker = ProcessWorker::new("/nonexistent/blogsheet-scrape");
    let err = worker.run("pymes").await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to spawn"));
}
