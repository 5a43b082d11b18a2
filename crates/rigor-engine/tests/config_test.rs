//! Configuration files and their effect on a runtime.

use std::fs;

use rigor_engine::{ClassDecl, ConfigError, DeclarationError, EngineConfig, Mode, Runtime};
use tempfile::TempDir;

#[test]
fn test_default_mode_follows_feature() {
    let expected = if cfg!(feature = "enforce") {
        Mode::Enforced
    } else {
        Mode::Passthrough
    };
    assert_eq!(Runtime::builder().mode(), expected);
}

#[test]
fn test_load_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rigor.toml");
    fs::write(
        &path,
        "[discipline]\nmode = \"passthrough\"\nstrict-friends = false\n",
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.mode(), Mode::Passthrough);

    let runtime = Runtime::builder_with(config).build().unwrap();
    assert_eq!(runtime.mode(), Mode::Passthrough);
    assert!(!runtime.config().discipline.strict_friends);
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();
    let err = EngineConfig::load(&temp.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_lenient_friends_in_enforced_mode() {
    let config = EngineConfig::enforced().strict_friends(false);
    let mut builder = Runtime::builder_with(config);
    builder
        .declare(ClassDecl::new("Test").friend("Nobody"))
        .unwrap();
    let runtime = builder.build().unwrap();
    let test = runtime.class("Test").unwrap();
    assert!(test.friends().contains_class("Nobody"));

    let mut strict = Runtime::builder_with(EngineConfig::enforced());
    strict
        .declare(ClassDecl::new("Test").friend("Nobody"))
        .unwrap();
    assert!(matches!(
        strict.build().unwrap_err(),
        DeclarationError::UnresolvedFriend { .. }
    ));
}
