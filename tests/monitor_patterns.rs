use std::error::Error;

use specwatch::config::ConfigFile;
use specwatch::watch::build_monitor_profiles;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn default_profiles_match_their_kind_suffix() -> TestResult {
    let cfg = ConfigFile::default();
    let profiles = build_monitor_profiles(&cfg.monitor)?;
    assert_eq!(profiles.len(), 2);

    let features = profiles.iter().find(|p| p.name() == "features").unwrap();
    assert!(features.matches("login.feature"));
    assert!(features.matches("admin/signup.feature"));
    assert!(!features.matches("login.feature.bak"));
    assert!(!features.matches("user_spec.rb"));

    let specs = profiles.iter().find(|p| p.name() == "specs").unwrap();
    assert!(specs.matches("user_spec.rb"));
    assert!(specs.matches("models/deep/user_spec.rb"));
    assert!(!specs.matches("user.rb"));
    assert!(!specs.matches("spec_helper.rb"));
    Ok(())
}

#[test]
fn custom_match_globs_replace_the_default() -> TestResult {
    let mut cfg = ConfigFile::default();
    cfg.monitor.get_mut("specs").unwrap().match_globs =
        Some(vec!["models/**/*_spec.rb".to_string()]);

    let profiles = build_monitor_profiles(&cfg.monitor)?;
    let specs = profiles.iter().find(|p| p.name() == "specs").unwrap();

    assert!(specs.matches("models/user_spec.rb"));
    assert!(!specs.matches("requests/user_spec.rb"));
    Ok(())
}
