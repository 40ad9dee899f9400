// src/engine/coordinator.rs

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::commands::CommandBuilder;
use crate::config::{ConfigFile, MonitorConfig, RunnerSection};
use crate::engine::state::{BranchDecision, RunState};
use crate::exec::{self, RunningChild};

/// Delay before the backstop interrupt when a branch change kills a run.
/// The first SIGINT may be caught for graceful shutdown; the second is not
/// expected to be.
const INTERRUPT_GRACE: Duration = Duration::from_millis(100);

/// Pause after the background-runner restart before releasing the lock, so
/// trailing exit events from the interrupted run drain without being
/// reported.
const BRANCH_SETTLE: Duration = Duration::from_millis(500);

/// Events sent into the coordinator from watchers, waiter tasks, timers, the
/// console and the Ctrl-C handler.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// One filesystem event's worth of matching files under a monitor root.
    FilesChanged {
        monitor: String,
        /// Paths relative to the monitor root.
        paths: Vec<String>,
    },
    /// The branch pointer file changed; carries the freshly parsed name.
    BranchChanged { branch: String },
    /// The current test-run child exited.
    RunExited { code: Option<i32> },
    /// Grace period after a branch-change interrupt elapsed.
    InterruptGraceElapsed,
    /// The background-runner stop command finished. `epoch` names the branch
    /// change that requested it.
    RunnerStopped { success: bool, epoch: u64 },
    /// Settle delay after a branch change elapsed.
    BranchSettled { epoch: u64 },
    /// A console line to forward to the child's stdin.
    StdinLine(String),
    /// User asked to cancel: Ctrl-C or `:quit` / `:exit`.
    CancelRequested,
    /// An unrecoverable watcher-side error.
    Fatal(anyhow::Error),
}

/// The run coordinator: the only place that mutates run state.
///
/// Consumes the unified event stream and enforces single-flight execution:
/// at most one test-run child exists at any time, change batches arriving
/// while the lock is held are dropped (not queued), and branch changes
/// pre-empt the lock until the background runner has been restarted.
pub struct Coordinator {
    state: RunState,
    builder: CommandBuilder,
    monitors: BTreeMap<String, MonitorConfig>,
    runner: RunnerSection,
    child: Option<RunningChild>,

    /// Counts branch changes. Stop completions and settle timers carry the
    /// epoch that scheduled them, so a change arriving mid-flow supersedes
    /// the earlier one instead of releasing the lock early.
    branch_epoch: u64,

    events_rx: mpsc::Receiver<RuntimeEvent>,
    /// Handed to waiter tasks and timers spawned by the coordinator itself.
    events_tx: mpsc::Sender<RuntimeEvent>,
}

impl Coordinator {
    pub fn new(
        cfg: &ConfigFile,
        initial_branch: Option<String>,
        events_rx: mpsc::Receiver<RuntimeEvent>,
        events_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            state: RunState::new(initial_branch),
            builder: CommandBuilder::new(cfg.runner.clone()),
            monitors: cfg.monitor.clone(),
            runner: cfg.runner.clone(),
            child: None,
            branch_epoch: 0,
            events_rx,
            events_tx,
        }
    }

    /// Main event loop. Returns when the user quits or a fatal watcher error
    /// arrives.
    pub async fn run(mut self) -> Result<()> {
        info!("coordinator started");

        while let Some(event) = self.events_rx.recv().await {
            if !self.handle_event(event).await? {
                break;
            }
        }

        info!("coordinator exiting");
        Ok(())
    }

    /// Dispatch one event. Returns `Ok(false)` to stop the loop.
    async fn handle_event(&mut self, event: RuntimeEvent) -> Result<bool> {
        match event {
            RuntimeEvent::FilesChanged { monitor, paths } => {
                self.handle_files_changed(&monitor, paths);
            }
            RuntimeEvent::BranchChanged { branch } => {
                self.handle_branch_changed(&branch);
            }
            RuntimeEvent::RunExited { code } => {
                self.handle_run_exited(code);
            }
            RuntimeEvent::InterruptGraceElapsed => {
                if let Some(child) = &self.child {
                    debug!("grace elapsed, child still running, interrupting again");
                    exec::interrupt(child.pid);
                }
            }
            RuntimeEvent::RunnerStopped { success, epoch } => {
                self.handle_runner_stopped(success, epoch);
            }
            RuntimeEvent::BranchSettled { epoch } => {
                if epoch == self.branch_epoch {
                    self.state.settle_branch_change();
                    debug!("branch change settled, resuming normal watching");
                } else {
                    debug!(epoch, "stale settle timer, a newer branch change is in progress");
                }
            }
            RuntimeEvent::StdinLine(line) => {
                self.forward_input(line);
            }
            RuntimeEvent::CancelRequested => {
                if let Some(child) = &self.child {
                    info!("interrupting current test run");
                    exec::interrupt(child.pid);
                } else {
                    info!("exiting");
                    return Ok(false);
                }
            }
            RuntimeEvent::Fatal(err) => return Err(err),
        }

        Ok(true)
    }

    /// A change batch from one of the file monitors.
    ///
    /// Batches arriving while the lock is held are dropped entirely; there is
    /// no queueing. Only the first built command of a batch is executed, even
    /// when several files changed together.
    fn handle_files_changed(&mut self, monitor_name: &str, paths: Vec<String>) {
        if !self.state.try_acquire() {
            debug!(monitor = %monitor_name, ?paths, "run in flight, change batch dropped");
            return;
        }

        let Some(monitor) = self.monitors.get(monitor_name).cloned() else {
            warn!(monitor = %monitor_name, "change batch for unknown monitor");
            self.state.release();
            return;
        };

        let commands = self.builder.build(&paths, &monitor);
        let Some(command) = commands.into_iter().next() else {
            self.state.release();
            return;
        };

        info!(file = %command.file, cmd = %command.display_line(), "running");

        match exec::spawn_run(&command, self.events_tx.clone()) {
            Ok(child) => self.child = Some(child),
            Err(err) => {
                // Spawn failures are ordinary: report and return to idle.
                error!(error = %err, "failed to launch test run");
                self.state.release();
            }
        }
    }

    /// The current child exited, on its own or after an interrupt.
    ///
    /// While a branch change is in progress the exit is absorbed silently so
    /// an interruption does not read like a test failure, and the lock stays
    /// with the branch-change flow.
    fn handle_run_exited(&mut self, code: Option<i32>) {
        self.child = None;

        if self.state.branch_changing() {
            debug!(?code, "run exit during branch change, not reported");
            return;
        }

        // Non-zero is ordinary test-failure signaling, not an error.
        match code {
            Some(code) => info!(exit_code = code, "test run finished"),
            None => info!("test run terminated by signal"),
        }
        self.state.release();
    }

    /// The branch pointer moved (or at least its file was touched).
    fn handle_branch_changed(&mut self, new_branch: &str) {
        let BranchDecision::Changed { previous } = self.state.observe_branch(new_branch) else {
            return;
        };

        info!(
            from = previous.as_deref().unwrap_or("<none>"),
            to = %new_branch,
            "branch change detected"
        );

        if let Some(child) = &self.child {
            exec::interrupt(child.pid);
            self.spawn_timer(INTERRUPT_GRACE, RuntimeEvent::InterruptGraceElapsed);
        }

        self.branch_epoch += 1;
        exec::spawn_runner_stop(&self.runner, self.events_tx.clone(), self.branch_epoch);
    }

    /// Background-runner stop finished; hold the lock for a little longer so
    /// trailing events from the interrupted run drain.
    ///
    /// A completion from an earlier epoch means another branch change arrived
    /// while this stop was running; its own stop will schedule the settle.
    fn handle_runner_stopped(&mut self, success: bool, epoch: u64) {
        if !success {
            warn!("background runner stop command did not exit cleanly");
        }

        if epoch != self.branch_epoch {
            debug!(epoch, "stale runner stop, superseded by a newer branch change");
            return;
        }

        if self.state.branch_changing() {
            self.spawn_timer(BRANCH_SETTLE, RuntimeEvent::BranchSettled { epoch });
        }
    }

    /// Push a console line towards the child's stdin; dropped silently when
    /// no run is active. The write itself happens on the child's writer task,
    /// so a child that stopped draining its stdin cannot stall the loop.
    fn forward_input(&mut self, line: String) {
        let Some(stdin_tx) = self.child.as_ref().and_then(|c| c.stdin_tx.as_ref()) else {
            debug!("no test run active, console line dropped");
            return;
        };

        if let Err(err) = stdin_tx.try_send(line) {
            warn!(error = %err, "dropping console line, test run not accepting input");
        }
    }

    fn spawn_timer(&self, after: Duration, event: RuntimeEvent) {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            sleep(after).await;
            let _ = tx.send(event).await;
        });
    }
}
