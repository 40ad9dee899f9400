// src/exec/process.rs

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::commands::RunCommand;
use crate::config::RunnerSection;
use crate::engine::RuntimeEvent;

/// Handles to the child the coordinator needs while the run is in flight.
///
/// The `tokio::process::Child` itself is owned by a detached waiter task and
/// its stdin pipe by a writer task, so the coordinator keeps only the pid
/// (for interrupts) and a non-blocking line channel (for console forwarding).
#[derive(Debug)]
pub struct RunningChild {
    pub pid: Option<u32>,
    pub stdin_tx: Option<mpsc::Sender<String>>,
}

/// Spawn a test-run child process.
///
/// stdin is piped so console input can be forwarded; stdout/stderr are
/// inherited so the runner's output goes straight to the terminal. A waiter
/// task reports termination back to the coordinator as
/// [`RuntimeEvent::RunExited`].
pub fn spawn_run(
    command: &RunCommand,
    events_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<RunningChild> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{}'", command.display_line()))?;

    let pid = child.id();
    let stdin_tx = child.stdin.take().map(spawn_stdin_writer);

    tokio::spawn(async move {
        let code = match child.wait().await {
            Ok(status) => status.code(),
            Err(err) => {
                error!(error = %err, "waiting for test run process failed");
                None
            }
        };
        let _ = events_tx.send(RuntimeEvent::RunExited { code }).await;
    });

    Ok(RunningChild { pid, stdin_tx })
}

/// Hand the stdin pipe to its own writer task.
///
/// The coordinator pushes console lines through the returned channel with
/// `try_send`, so a child that stops draining its stdin can never stall the
/// event loop. Each line gets a newline terminator appended.
fn spawn_stdin_writer(mut stdin: ChildStdin) -> mpsc::Sender<String> {
    let (tx, mut rx) = mpsc::channel::<String>(16);

    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            let mut buf = line.into_bytes();
            buf.push(b'\n');
            if let Err(err) = stdin.write_all(&buf).await {
                warn!(error = %err, "failed to forward console line to test run");
                return;
            }
        }
    });

    tx
}

/// Send SIGINT to a running child.
///
/// The signal goes to both the pid and its process group so runners that
/// fork (e.g. a browser driver) get a chance to shut down too. The child is
/// trusted to honor the signal; the coordinator schedules a second interrupt
/// as a backstop rather than escalating to a hard kill.
pub fn interrupt(pid: Option<u32>) {
    if let Some(pid) = pid {
        send_interrupt_signal(pid);
    }
}

#[cfg(unix)]
fn send_interrupt_signal(pid: u32) {
    unsafe {
        let pid = pid as i32;
        let _ = libc::kill(-pid, libc::SIGINT);
        let _ = libc::kill(pid, libc::SIGINT);
    }
}

#[cfg(not(unix))]
fn send_interrupt_signal(_pid: u32) {}

/// Stop the background runner and wait for the stop command to finish.
///
/// Used at startup so the first test run starts from a clean interpreter
/// cache. Failure is not fatal; the project may simply not use a background
/// runner yet.
pub async fn stop_runner(runner: &RunnerSection) -> bool {
    info!(cmd = %runner.stop, "stopping background runner");
    run_shell(&runner.stop).await
}

/// Fire the background-runner stop command and report its completion to the
/// coordinator as [`RuntimeEvent::RunnerStopped`].
///
/// Used during branch changes, where the coordinator keeps the lock held
/// until the completion event arrives. `epoch` identifies the branch change
/// that requested this stop; the coordinator ignores completions that have
/// been superseded by a newer change.
pub fn spawn_runner_stop(runner: &RunnerSection, events_tx: mpsc::Sender<RuntimeEvent>, epoch: u64) {
    info!(cmd = %runner.stop, "stopping background runner");
    let stop_cmd = runner.stop.clone();
    tokio::spawn(async move {
        let success = run_shell(&stop_cmd).await;
        let _ = events_tx
            .send(RuntimeEvent::RunnerStopped { success, epoch })
            .await;
    });
}

/// Run a shell command to completion, returning whether it exited 0.
async fn run_shell(command_line: &str) -> bool {
    // Shell per platform, same convention as task commands elsewhere.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command_line);
        c
    };

    cmd.stdin(Stdio::null());

    match cmd.status().await {
        Ok(status) => status.success(),
        Err(err) => {
            warn!(cmd = %command_line, error = %err, "shell command failed to start");
            false
        }
    }
}
