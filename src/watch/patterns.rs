// src/watch/patterns.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::MonitorConfig;

/// Compiled inclusion patterns for a single monitor.
///
/// The watcher passes paths relative to the monitor root (e.g.
/// `"models/user_spec.rb"`) into `matches`. There is no exclusion set: a
/// monitor admits everything its inclusion globs match.
#[derive(Clone)]
pub struct MonitorProfile {
    name: String,
    root: PathBuf,
    include: GlobSet,
}

impl fmt::Debug for MonitorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorProfile")
            .field("name", &self.name)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl MonitorProfile {
    /// Name of the monitor this profile belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the monitor watches.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Returns true if the monitor is interested in the given path, relative
    /// to its root.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.include.is_match(rel_path)
    }
}

/// Compile a watch profile for each configured monitor.
pub fn build_monitor_profiles(
    monitors: &BTreeMap<String, MonitorConfig>,
) -> Result<Vec<MonitorProfile>> {
    let mut profiles = Vec::with_capacity(monitors.len());

    for (name, monitor) in monitors {
        let include = build_globset(&monitor.effective_globs())
            .with_context(|| format!("building match globset for monitor {name}"))?;

        profiles.push(MonitorProfile {
            name: name.clone(),
            root: PathBuf::from(&monitor.path),
            include,
        });
    }

    Ok(profiles)
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
