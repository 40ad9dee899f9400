// src/commands/paths.rs

use std::path::{Path, PathBuf};

/// Resolve a path reported relative to a monitor root into an absolute path.
///
/// Resolution is purely lexical (relative to the current working directory);
/// the file is not required to exist, since it may already have been deleted
/// by the time the change event is handled.
pub fn resolve_total_path(monitor_root: &str, rel_path: &str) -> PathBuf {
    let joined = Path::new(monitor_root).join(rel_path);
    std::path::absolute(&joined).unwrap_or(joined)
}
