use std::error::Error;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use specwatch::commands::CommandBuilder;
use specwatch::config::{MonitorConfig, RunnerSection, TestKind};

type TestResult = Result<(), Box<dyn Error>>;

fn monitor(dir: &TempDir, kind: TestKind) -> MonitorConfig {
    MonitorConfig {
        path: dir.path().to_str().unwrap().to_string(),
        kind,
        match_globs: None,
    }
}

fn builder() -> CommandBuilder {
    CommandBuilder::new(RunnerSection::default())
}

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn plain_spec_file_runs_rspec_through_the_wrapper() -> TestResult {
    let dir = TempDir::new()?;
    write(&dir, "foo_spec.rb", "describe 'foo' do\nend\n");

    let mut builder = builder();
    let commands = builder.build(&["foo_spec.rb".into()], &monitor(&dir, TestKind::Spec));

    assert_eq!(commands.len(), 1);
    let cmd = &commands[0];
    assert_eq!(cmd.program, "bundle");
    assert_eq!(cmd.args[..3], ["exec", "spring", "rspec"]);

    let path = Path::new(&cmd.args[3]);
    assert!(path.is_absolute());
    assert!(path.ends_with("foo_spec.rb"));

    // No focus flags anywhere.
    assert!(!cmd.args.iter().any(|a| a.contains("focus")));
    assert!(builder.focused().is_none());
    Ok(())
}

#[test]
fn feature_with_focus_tag_gets_tag_flags_and_sets_focus() -> TestResult {
    let dir = TempDir::new()?;
    write(&dir, "bar.feature", "@focus\nFeature: bar\n");

    let mut builder = builder();
    let commands = builder.build(&["bar.feature".into()], &monitor(&dir, TestKind::Feature));

    assert_eq!(commands.len(), 1);
    let cmd = &commands[0];
    assert_eq!(cmd.args[..3], ["exec", "spring", "cucumber"]);

    let tail = &cmd.args[cmd.args.len() - 3..];
    assert_eq!(tail, ["--tags", "@focus", "--fail-fast"]);

    let focused = builder.focused().expect("focus should be set");
    assert!(focused.ends_with("bar.feature"));
    Ok(())
}

#[test]
fn spec_focus_flags_sit_before_the_file_path() -> TestResult {
    let dir = TempDir::new()?;
    write(&dir, "user_spec.rb", "it 'works', focus: true do\nend\n");

    let mut builder = builder();
    let commands = builder.build(&["user_spec.rb".into()], &monitor(&dir, TestKind::Spec));

    let cmd = &commands[0];
    let n = cmd.args.len();
    assert_eq!(cmd.args[..3], ["exec", "spring", "rspec"]);
    assert_eq!(cmd.args[n - 3], "--tag");
    assert_eq!(cmd.args[n - 2], "focus");
    assert!(cmd.args[n - 1].ends_with("user_spec.rb"));
    Ok(())
}

#[test]
fn hash_rocket_focus_marker_is_recognized_too() -> TestResult {
    let dir = TempDir::new()?;
    write(&dir, "old_spec.rb", "it 'works', :focus => true do\nend\n");

    let mut builder = builder();
    builder.build(&["old_spec.rb".into()], &monitor(&dir, TestKind::Spec));

    assert!(builder.focused().is_some());
    Ok(())
}

#[test]
fn removing_the_marker_clears_focus_and_yields_no_command() -> TestResult {
    let dir = TempDir::new()?;
    let monitor = monitor(&dir, TestKind::Feature);
    let mut builder = builder();

    write(&dir, "bar.feature", "@focus\nFeature: bar\n");
    builder.build(&["bar.feature".into()], &monitor);
    assert!(builder.focused().is_some());

    write(&dir, "bar.feature", "Feature: bar\n");
    let commands = builder.build(&["bar.feature".into()], &monitor);

    assert!(commands.is_empty());
    assert!(builder.focused().is_none());
    Ok(())
}

#[test]
fn a_second_focused_file_supersedes_the_first() -> TestResult {
    let dir = TempDir::new()?;
    let monitor = monitor(&dir, TestKind::Feature);
    let mut builder = builder();

    write(&dir, "first.feature", "@focus\nFeature: first\n");
    write(&dir, "second.feature", "@focus\nFeature: second\n");

    builder.build(&["first.feature".into()], &monitor);
    builder.build(&["second.feature".into()], &monitor);

    let focused = builder.focused().expect("focus should be set");
    assert!(focused.ends_with("second.feature"));
    Ok(())
}

#[test]
fn unfocused_observation_of_another_file_keeps_focus() -> TestResult {
    let dir = TempDir::new()?;
    let monitor = monitor(&dir, TestKind::Feature);
    let mut builder = builder();

    write(&dir, "focused.feature", "@focus\nFeature: focused\n");
    write(&dir, "other.feature", "Feature: other\n");

    builder.build(&["focused.feature".into()], &monitor);
    let commands = builder.build(&["other.feature".into()], &monitor);

    assert_eq!(commands.len(), 1);
    let focused = builder.focused().expect("focus should survive");
    assert!(focused.ends_with("focused.feature"));
    Ok(())
}

#[test]
fn files_not_matching_the_monitor_suffix_yield_nothing() -> TestResult {
    let dir = TempDir::new()?;
    write(&dir, "helper.rb", "module Helper\nend\n");

    let mut builder = builder();
    let commands = builder.build(&["helper.rb".into()], &monitor(&dir, TestKind::Spec));

    assert!(commands.is_empty());
    Ok(())
}

#[test]
fn multi_file_batches_keep_input_order() -> TestResult {
    // The coordinator only ever executes the first command of a batch; the
    // builder must therefore preserve the batch order.
    let dir = TempDir::new()?;
    write(&dir, "a_spec.rb", "describe 'a' do\nend\n");
    write(&dir, "b_spec.rb", "describe 'b' do\nend\n");

    let mut builder = builder();
    let commands = builder.build(
        &["a_spec.rb".into(), "b_spec.rb".into()],
        &monitor(&dir, TestKind::Spec),
    );

    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].file, "a_spec.rb");
    assert_eq!(commands[1].file, "b_spec.rb");
    Ok(())
}

#[test]
fn missing_file_builds_a_plain_command() -> TestResult {
    // The file may be gone by the time the batch is handled; the run is still
    // attempted and the runner reports the missing file itself.
    let dir = TempDir::new()?;

    let mut builder = builder();
    let commands = builder.build(&["gone_spec.rb".into()], &monitor(&dir, TestKind::Spec));

    assert_eq!(commands.len(), 1);
    assert!(builder.focused().is_none());
    Ok(())
}
