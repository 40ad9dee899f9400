// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from `Specwatch.toml`.
///
/// ```toml
/// [runner]
/// program = "bundle"
/// wrapper = ["exec", "spring"]
/// stop = "bundle exec spring stop"
///
/// [monitor.features]
/// path = "./features/"
/// kind = "feature"
///
/// [monitor.specs]
/// path = "./spec/"
/// kind = "spec"
/// ```
///
/// All sections are optional; with no config file at all the defaults below
/// reproduce a standard Rails layout (cucumber features + rspec specs run
/// through bundler and spring).
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// `[runner]`: how test commands are wrapped and how the background
    /// runner is stopped.
    #[serde(default)]
    pub runner: RunnerSection,

    /// `[branch]`: where version-control metadata lives.
    #[serde(default)]
    pub branch: BranchSection,

    /// All monitors from `[monitor.<name>]`. Keys are monitor names used in
    /// log output only.
    #[serde(default = "default_monitors")]
    pub monitor: BTreeMap<String, MonitorConfig>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            runner: RunnerSection::default(),
            branch: BranchSection::default(),
            monitor: default_monitors(),
        }
    }
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    /// Executable every test command starts with.
    #[serde(default = "default_runner_program")]
    pub program: String,

    /// Arguments placed before the target runner name, typically invoking a
    /// persistent pre-warmed process manager.
    #[serde(default = "default_runner_wrapper")]
    pub wrapper: Vec<String>,

    /// Shell command that stops the background runner. Issued once at startup
    /// and again on every branch change.
    #[serde(default = "default_runner_stop")]
    pub stop: String,
}

fn default_runner_program() -> String {
    "bundle".to_string()
}

fn default_runner_wrapper() -> Vec<String> {
    vec!["exec".to_string(), "spring".to_string()]
}

fn default_runner_stop() -> String {
    "bundle exec spring stop".to_string()
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            program: default_runner_program(),
            wrapper: default_runner_wrapper(),
            stop: default_runner_stop(),
        }
    }
}

/// `[branch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchSection {
    /// Directory containing the `HEAD` file that encodes the active branch.
    #[serde(default = "default_git_dir")]
    pub git_dir: String,
}

fn default_git_dir() -> String {
    ".git".to_string()
}

impl Default for BranchSection {
    fn default() -> Self {
        Self {
            git_dir: default_git_dir(),
        }
    }
}

/// `[monitor.<name>]` section: one watched directory tree.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Root directory to watch, relative to the working directory.
    pub path: String,

    /// Which kind of test files live here; decides suffix, runner and focus
    /// marker syntax.
    pub kind: TestKind,

    /// Optional inclusion globs, evaluated against paths relative to `path`.
    ///
    /// If `None`, the kind's default glob is used (`**/*.feature` or
    /// `**/*_spec.rb`).
    #[serde(default, rename = "match")]
    pub match_globs: Option<Vec<String>>,
}

impl MonitorConfig {
    /// Effective inclusion globs for this monitor.
    pub fn effective_globs(&self) -> Vec<String> {
        match &self.match_globs {
            Some(globs) => globs.clone(),
            None => vec![self.kind.default_glob().to_string()],
        }
    }
}

/// The two known test-file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// Acceptance-style `.feature` files, run with cucumber.
    Feature,
    /// Example-style `_spec.rb` files, run with rspec.
    Spec,
}

impl TestKind {
    /// File-name suffix identifying this kind.
    pub fn suffix(&self) -> &'static str {
        match self {
            TestKind::Feature => ".feature",
            TestKind::Spec => "_spec.rb",
        }
    }

    /// Name of the target runner invoked through the wrapper.
    pub fn runner_name(&self) -> &'static str {
        match self {
            TestKind::Feature => "cucumber",
            TestKind::Spec => "rspec",
        }
    }

    /// Fixed arguments appended after the file path.
    pub fn extra_args(&self) -> &'static [&'static str] {
        match self {
            TestKind::Feature => &["--color", "--no-source"],
            TestKind::Spec => &[],
        }
    }

    /// Default inclusion glob for monitors of this kind.
    pub fn default_glob(&self) -> &'static str {
        match self {
            TestKind::Feature => "**/*.feature",
            TestKind::Spec => "**/*_spec.rb",
        }
    }
}

fn default_monitors() -> BTreeMap<String, MonitorConfig> {
    let mut monitors = BTreeMap::new();
    monitors.insert(
        "features".to_string(),
        MonitorConfig {
            path: "./features/".to_string(),
            kind: TestKind::Feature,
            match_globs: None,
        },
    );
    monitors.insert(
        "specs".to_string(),
        MonitorConfig {
            path: "./spec/".to_string(),
            kind: TestKind::Spec,
            match_globs: None,
        },
    );
    monitors
}
