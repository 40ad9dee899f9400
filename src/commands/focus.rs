// src/commands/focus.rs

//! In-file focus marker detection.
//!
//! A focus marker narrows execution to a single test file: feature files are
//! tagged `@focus`, spec files carry rspec metadata (`focus: true` or the
//! older `:focus => true` hash-rocket form).

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::TestKind;

const FEATURE_FOCUS_TAG: &str = "@focus";
const SPEC_FOCUS_MARKERS: [&str; 2] = ["focus: true", ":focus => true"];

/// Returns true if the file at `path` contains the focus marker for `kind`.
///
/// A file that cannot be read is treated as unfocused; it may have been
/// removed between the change event and this inspection.
pub fn has_focus_marker(kind: TestKind, path: &Path) -> bool {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not inspect file for focus marker");
            return false;
        }
    };

    match kind {
        TestKind::Feature => contents.contains(FEATURE_FOCUS_TAG),
        TestKind::Spec => SPEC_FOCUS_MARKERS
            .iter()
            .any(|marker| contents.contains(marker)),
    }
}
