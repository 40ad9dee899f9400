// src/commands/builder.rs

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::commands::focus::has_focus_marker;
use crate::commands::paths::resolve_total_path;
use crate::config::{MonitorConfig, RunnerSection, TestKind};

/// One runnable test command, built fresh per change batch and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    /// Path of the changed file, relative to its monitor root.
    pub file: String,
    /// Executable to spawn.
    pub program: String,
    /// Full argument list, including the absolute file path.
    pub args: Vec<String>,
}

impl RunCommand {
    /// Human-readable command line for status output.
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Builds run commands for change batches and owns the focus cache.
///
/// At most one file holds focus at a time; focusing a new file silently
/// supersedes the previous one. When the focused file is later observed
/// without its marker, a "focus removed" notice is emitted and no command is
/// produced for that file.
///
/// Note: the coordinator only ever executes the first command of a batch,
/// even when several files changed together. `build` still returns the whole
/// list so the policy stays in one place (the coordinator).
pub struct CommandBuilder {
    runner: RunnerSection,
    focus: Option<PathBuf>,
}

impl CommandBuilder {
    pub fn new(runner: RunnerSection) -> Self {
        Self {
            runner,
            focus: None,
        }
    }

    /// Absolute path of the currently focused file, if any.
    pub fn focused(&self) -> Option<&Path> {
        self.focus.as_deref()
    }

    /// Build the run-worthy commands for one change batch.
    ///
    /// Files that do not carry the monitor's suffix yield nothing, as does a
    /// focus-removal observation.
    pub fn build(&mut self, paths: &[String], monitor: &MonitorConfig) -> Vec<RunCommand> {
        paths
            .iter()
            .filter_map(|rel| self.build_one(rel, monitor))
            .collect()
    }

    fn build_one(&mut self, rel_path: &str, monitor: &MonitorConfig) -> Option<RunCommand> {
        let kind = monitor.kind;
        if !rel_path.ends_with(kind.suffix()) {
            debug!(file = %rel_path, "file does not match monitor suffix, skipping");
            return None;
        }

        let total = resolve_total_path(&monitor.path, rel_path);
        let total_str = total.to_string_lossy().into_owned();

        let mut args = self.runner.wrapper.clone();
        args.push(kind.runner_name().to_string());
        args.push(total_str);
        args.extend(kind.extra_args().iter().map(|a| a.to_string()));

        if has_focus_marker(kind, &total) {
            apply_focus_flags(kind, &mut args);
            info!(file = %rel_path, "focus set");
            self.focus = Some(total);
        } else if self.focus.as_deref() == Some(total.as_path()) {
            self.focus = None;
            info!(file = %rel_path, "focus removed");
            return None;
        }

        Some(RunCommand {
            file: rel_path.to_string(),
            program: self.runner.program.clone(),
            args,
        })
    }
}

/// Append the focus-restricting flags for the given kind.
///
/// Feature runs are narrowed via cucumber tags at the end of the line; spec
/// runs take the rspec `--tag focus` pair immediately before the file path,
/// which sits last in the argument list for spec commands.
fn apply_focus_flags(kind: TestKind, args: &mut Vec<String>) {
    match kind {
        TestKind::Feature => {
            args.push("--tags".to_string());
            args.push("@focus".to_string());
            args.push("--fail-fast".to_string());
        }
        TestKind::Spec => {
            let at = args.len() - 1;
            args.insert(at, "--tag".to_string());
            args.insert(at + 1, "focus".to_string());
        }
    }
}
