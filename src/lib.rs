// src/lib.rs

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_or_default;
use crate::engine::{Coordinator, RuntimeEvent};
use crate::watch::{build_monitor_profiles, spawn_branch_watcher, spawn_monitors};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - initial branch detection
/// - file + branch watchers
/// - interactive console and Ctrl-C handling
/// - the run coordinator event loop
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_or_default(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    // Missing HEAD is fine (not a repository yet); other read errors are not.
    let initial_branch = watch::read_current_branch(Path::new(&cfg.branch.git_dir))?;
    if let Some(branch) = &initial_branch {
        info!(branch = %branch, "tracking branch");
    }

    // Unified event channel: all producers feed the coordinator.
    let (events_tx, events_rx) = mpsc::channel::<RuntimeEvent>(64);

    // File monitors, one per configured root.
    let profiles = build_monitor_profiles(&cfg.monitor)?;
    let _monitor_handles = spawn_monitors(profiles, &events_tx)?;

    // Branch pointer watcher.
    let _branch_handle = spawn_branch_watcher(cfg.branch.git_dir.clone(), events_tx.clone())?;

    // Console input and Ctrl-C both turn into cancel/forward events.
    console::spawn_console(events_tx.clone());
    spawn_ctrl_c_handler(events_tx.clone());

    // Reset the background runner so the first run starts from a clean
    // interpreter cache.
    exec::stop_runner(&cfg.runner).await;

    let watched: Vec<&str> = cfg.monitor.values().map(|m| m.path.as_str()).collect();
    info!(roots = ?watched, "watching for file changes");

    let coordinator = Coordinator::new(&cfg, initial_branch, events_rx, events_tx);
    coordinator.run().await
}

/// Ctrl-C → cancel request (interrupt the child, or exit when idle).
///
/// Repeated presses are forwarded again, mirroring the console's cancel
/// handling.
fn spawn_ctrl_c_handler(events_tx: mpsc::Sender<RuntimeEvent>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            if events_tx.send(RuntimeEvent::CancelRequested).await.is_err() {
                return;
            }
        }
    });
}

/// Simple dry-run output: print the runner and monitors.
fn print_dry_run(cfg: &ConfigFile) {
    println!("specwatch dry-run");
    println!("  runner.program = {}", cfg.runner.program);
    println!("  runner.wrapper = {:?}", cfg.runner.wrapper);
    println!("  runner.stop = {}", cfg.runner.stop);
    println!("  branch.git_dir = {}", cfg.branch.git_dir);
    println!();

    println!("monitors ({}):", cfg.monitor.len());
    for (name, monitor) in cfg.monitor.iter() {
        println!("  - {name}");
        println!("      path: {}", monitor.path);
        println!("      kind: {:?}", monitor.kind);
        println!("      match: {:?}", monitor.effective_globs());
    }
}
