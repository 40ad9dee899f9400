use std::error::Error;
use std::fs;

use tempfile::TempDir;

use specwatch::config::{ConfigFile, TestKind, load_or_default, validate_config};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn missing_config_file_falls_back_to_defaults() -> TestResult {
    let dir = TempDir::new()?;
    let cfg = load_or_default(dir.path().join("Specwatch.toml"))?;

    assert_eq!(cfg.runner.program, "bundle");
    assert_eq!(cfg.runner.wrapper, ["exec", "spring"]);
    assert_eq!(cfg.runner.stop, "bundle exec spring stop");
    assert_eq!(cfg.branch.git_dir, ".git");

    assert_eq!(cfg.monitor.len(), 2);
    assert_eq!(cfg.monitor["features"].kind, TestKind::Feature);
    assert_eq!(cfg.monitor["features"].path, "./features/");
    assert_eq!(cfg.monitor["specs"].kind, TestKind::Spec);
    assert_eq!(cfg.monitor["specs"].path, "./spec/");
    Ok(())
}

#[test]
fn config_file_overrides_runner_and_monitors() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("Specwatch.toml");
    fs::write(
        &path,
        r#"
[runner]
program = "bin/rails"
wrapper = []
stop = "bin/spring stop"

[monitor.unit]
path = "./spec/"
kind = "spec"
match = ["models/**/*_spec.rb"]
"#,
    )?;

    let cfg = load_or_default(&path)?;
    assert_eq!(cfg.runner.program, "bin/rails");
    assert!(cfg.runner.wrapper.is_empty());
    assert_eq!(cfg.monitor.len(), 1);
    assert_eq!(
        cfg.monitor["unit"].effective_globs(),
        ["models/**/*_spec.rb"]
    );
    Ok(())
}

#[test]
fn default_globs_follow_the_kind() {
    let cfg = ConfigFile::default();
    assert_eq!(cfg.monitor["features"].effective_globs(), ["**/*.feature"]);
    assert_eq!(cfg.monitor["specs"].effective_globs(), ["**/*_spec.rb"]);
}

#[test]
fn broken_toml_is_fatal() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("Specwatch.toml");
    fs::write(&path, "[runner\nprogram = ")?;

    assert!(load_or_default(&path).is_err());
    Ok(())
}

#[test]
fn duplicate_monitor_paths_are_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("Specwatch.toml");
    fs::write(
        &path,
        r#"
[monitor.a]
path = "./spec/"
kind = "spec"

[monitor.b]
path = "./spec/"
kind = "feature"
"#,
    )?;

    assert!(load_or_default(&path).is_err());
    Ok(())
}

#[test]
fn empty_monitor_path_is_rejected() {
    let mut cfg = ConfigFile::default();
    cfg.monitor.get_mut("specs").unwrap().path = "".to_string();
    assert!(validate_config(&cfg).is_err());
}

#[test]
fn empty_runner_program_is_rejected() {
    let mut cfg = ConfigFile::default();
    cfg.runner.program = "  ".to_string();
    assert!(validate_config(&cfg).is_err());
}

#[test]
fn invalid_match_glob_is_rejected() {
    let mut cfg = ConfigFile::default();
    cfg.monitor.get_mut("specs").unwrap().match_globs = Some(vec!["spec/{".to_string()]);
    assert!(validate_config(&cfg).is_err());
}
