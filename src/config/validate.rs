// src/config/validate.rs

use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use globset::Glob;

use crate::config::model::ConfigFile;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one monitor
/// - monitor paths are non-empty and do not repeat
/// - inclusion globs compile
/// - the runner program is non-empty
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_monitors(cfg)?;
    validate_runner(cfg)?;
    validate_monitors(cfg)?;
    Ok(())
}

fn ensure_has_monitors(cfg: &ConfigFile) -> Result<()> {
    if cfg.monitor.is_empty() {
        return Err(anyhow!(
            "config must contain at least one [monitor.<name>] section"
        ));
    }
    Ok(())
}

fn validate_runner(cfg: &ConfigFile) -> Result<()> {
    if cfg.runner.program.trim().is_empty() {
        return Err(anyhow!("[runner].program must not be empty"));
    }
    if cfg.runner.stop.trim().is_empty() {
        return Err(anyhow!("[runner].stop must not be empty"));
    }
    Ok(())
}

fn validate_monitors(cfg: &ConfigFile) -> Result<()> {
    let mut seen_paths: HashSet<&str> = HashSet::new();

    for (name, monitor) in cfg.monitor.iter() {
        if monitor.path.trim().is_empty() {
            return Err(anyhow!("monitor '{}' has an empty path", name));
        }
        if !seen_paths.insert(monitor.path.as_str()) {
            return Err(anyhow!(
                "monitor '{}' repeats path '{}' already used by another monitor",
                name,
                monitor.path
            ));
        }

        for pattern in monitor.effective_globs() {
            Glob::new(&pattern).with_context(|| {
                format!("invalid match glob '{}' for monitor '{}'", pattern, name)
            })?;
        }
    }

    Ok(())
}
