use std::fs;
use std::path::PathBuf;

use dinesearch::config::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, DataSettings};
use dinesearch::{MatchPolicy, SearchConfig, SearchError};
use serial_test::serial;
use tempfile::TempDir;

fn write_config(dir: &std::path::Path, body: &str) -> PathBuf {
    let path = dir.join(CONFIG_FILE_NAME);
    fs::write(&path, body).expect("write config");
    path
}

#[test]
fn nearest_ancestor_config_is_used() {
    let root = TempDir::new().expect("temp dir");
    let config_path = write_config(root.path(), "[parser]\nmatch_policy = \"first_wins\"\n");
    let nested = root.path().join("a").join("b");
    fs::create_dir_all(&nested).expect("nested dirs");

    let config = SearchConfig::find_from(&nested).expect("load config");
    assert_eq!(config.parser.match_policy, MatchPolicy::FirstWins);
    assert_eq!(config.source, Some(config_path));
}

#[test]
fn closer_config_shadows_outer_one() {
    let root = TempDir::new().expect("temp dir");
    write_config(root.path(), "[fields]\nname = \"outer\"\n");
    let inner = root.path().join("project");
    fs::create_dir_all(&inner).expect("inner dir");
    write_config(&inner, "[fields]\nname = \"inner\"\n");

    let config = SearchConfig::find_from(&inner).expect("load config");
    assert_eq!(config.fields.name, "inner");
}

#[test]
fn invalid_toml_is_a_config_error() {
    let root = TempDir::new().expect("temp dir");
    let path = write_config(root.path(), "[parser\nmatch_policy = ");

    let err = SearchConfig::load(&path).expect_err("broken toml");
    assert!(matches!(err, SearchError::Config(_)));
}

#[test]
fn unknown_policy_is_rejected() {
    let root = TempDir::new().expect("temp dir");
    let path = write_config(root.path(), "[parser]\nmatch_policy = \"random\"\n");

    assert!(matches!(SearchConfig::load(&path), Err(SearchError::Config(_))));
}

#[test]
fn blank_column_name_is_rejected() {
    let root = TempDir::new().expect("temp dir");
    let path = write_config(root.path(), "[fields]\ncity = \"  \"\n");

    let err = SearchConfig::load(&path).expect_err("blank column");
    assert!(matches!(err, SearchError::InvalidConfig { .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let root = TempDir::new().expect("temp dir");
    let missing = root.path().join("nope.toml");

    let err = SearchConfig::load(&missing).expect_err("missing file");
    assert!(matches!(err, SearchError::Io { path, .. } if path == missing));
}

#[test]
#[serial]
fn env_var_overrides_directory_lookup() {
    let root = TempDir::new().expect("temp dir");
    let path = root.path().join("custom.toml");
    fs::write(&path, "[fields]\naddress = \"street\"\n").expect("write config");

    unsafe { std::env::set_var(CONFIG_ENV_VAR, &path) };
    let result = SearchConfig::discover();
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    let config = result.expect("discover config");
    assert_eq!(config.fields.address, "street");
    assert_eq!(config.source, Some(path));
}

#[test]
#[serial]
fn data_placeholder_reads_environment() {
    let data = DataSettings::default();

    unsafe { std::env::set_var("DINESEARCH_DATA", "/srv/restaurants.json") };
    let resolved = data.resolve_path();
    unsafe { std::env::remove_var("DINESEARCH_DATA") };
    assert_eq!(resolved.expect("resolved path"), PathBuf::from("/srv/restaurants.json"));

    let err = data.resolve_path().expect_err("variable removed");
    assert!(matches!(err, SearchError::MissingEnv { name } if name == "DINESEARCH_DATA"));
}
