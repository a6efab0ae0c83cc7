//! Running one scrape in isolation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// How a worker finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    Code(i32),
    /// Terminated by a signal; no exit code exists.
    Signal,
}

impl ExitState {
    pub fn success(&self) -> bool {
        matches!(self, Self::Code(0))
    }
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Signal => f.write_str("signal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub exit: ExitState,
    pub stdout_lines: usize,
    pub stderr_lines: usize,
}

/// Runs a scrape for one category. An `Err` means the worker never started.
#[async_trait]
pub trait ScrapeWorker: Send + Sync {
    async fn run(&self, category: &str) -> Result<WorkerOutcome>;
}

/// Spawns the scrape binary as a child process, category as its last argument.
#[derive(Debug, Clone)]
pub struct ProcessWorker {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessWorker {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the category.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Forward each line of a child stream to tracing; returns the lines relayed.
/// A read error ends the relay but not the run.
async fn relay<R>(reader: R, stream: Stream) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut lines = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => return lines,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    target: "worker",
                    stream = stream.name(),
                    error = %e,
                    lines,
                    "stopped relaying worker output"
                );
                return lines;
            }
        }
        lines += 1;
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        match stream {
            Stream::Stdout => tracing::info!(target: "worker.stdout", "{line}"),
            Stream::Stderr => tracing::info!(target: "worker.stderr", "{line}"),
        }
    }
}

async fn relayed_lines(task: JoinHandle<usize>, stream: Stream) -> usize {
    task.await.unwrap_or_else(|e| {
        tracing::warn!(
            target: "worker",
            stream = stream.name(),
            error = %e,
            "output relay task failed"
        );
        0
    })
}

#[async_trait]
impl ScrapeWorker for ProcessWorker {
    async fn run(&self, category: &str) -> Result<WorkerOutcome> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(category)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.program.display()))?;
        tracing::info!(
            target: "worker",
            program = %self.program.display(),
            category,
            pid = child.id(),
            "scrape worker started"
        );

        let stdout = child.stdout.take().context("child stdout not captured")?;
        let stderr = child.stderr.take().context("child stderr not captured")?;
        let stdout_task = tokio::spawn(relay(stdout, Stream::Stdout));
        let stderr_task = tokio::spawn(relay(stderr, Stream::Stderr));

        let status = child.wait().await.context("failed to wait for scrape worker")?;
        let stdout_lines = relayed_lines(stdout_task, Stream::Stdout).await;
        let stderr_lines = relayed_lines(stderr_task, Stream::Stderr).await;

        let exit = status.code().map_or(ExitState::Signal, ExitState::Code);
        tracing::info!(
            target: "worker",
            category,
            exit = %exit,
            stdout_lines,
            stderr_lines,
            "scrape worker finished"
        );
        Ok(WorkerOutcome {
            exit,
            stdout_lines,
            stderr_lines,
        })
    }
}
