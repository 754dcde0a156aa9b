//! No-mock loading tests against real files on disk.
//!
//! Covers:
//! - Catalogue and statistics loading from files
//! - Count mismatch surfaced from a file
//! - Settings resolution order (CLI > env path > env dir > XDG)

use ids_common::{Error, EventKind};
use ids_config::resolve::{resolve_settings_path_with, ConfigSource, ENV_CONFIG_DIR, ENV_CONFIG_PATH};
use ids_config::{check_consistency, load_events, load_stats, Settings, SETTINGS_FILENAME};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn loads_consistent_pair_from_disk() {
    let dir = TempDir::new().unwrap();
    let events = write(
        dir.path(),
        "Events.txt",
        "2\nLogins:D:0::2\nTime online:C:0:1440:3\n",
    );
    let stats = write(dir.path(), "Stats.txt", "2\nLogins:4:1.5\nTime online:150.5:25\n");

    let events = load_events(&events).unwrap();
    let stats = load_stats(&stats).unwrap();

    assert_eq!(events["Logins"].kind, EventKind::Discrete);
    assert_eq!(events["Time online"].weight, 3);
    assert!(check_consistency(&events, &stats).is_empty());
}

#[test]
fn count_header_of_two_with_one_line_fails() {
    let dir = TempDir::new().unwrap();
    let events = write(dir.path(), "Events.txt", "2\nA:D:0:10:1\n");

    let err = load_events(&events).unwrap_err();
    assert!(matches!(
        err,
        Error::DeclaredCountMismatch {
            declared: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_stats(&dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn resolution_order() {
    let dir = TempDir::new().unwrap();
    let cli = write(dir.path(), "cli.toml", "");
    let env_file = write(dir.path(), "env.toml", "");
    let env_dir = dir.path().join("envdir");
    fs::create_dir_all(&env_dir).unwrap();
    write(&env_dir, SETTINGS_FILENAME, "");
    let xdg_dir = dir.path().join("xdg");
    fs::create_dir_all(&xdg_dir).unwrap();
    write(&xdg_dir, SETTINGS_FILENAME, "");

    let env_file_s = env_file.display().to_string();
    let env_dir_s = env_dir.display().to_string();
    let env = |key: &str| match key {
        k if k == ENV_CONFIG_PATH => Some(env_file_s.clone()),
        k if k == ENV_CONFIG_DIR => Some(env_dir_s.clone()),
        _ => None,
    };

    let (path, source) = resolve_settings_path_with(Some(&cli), env, Some(xdg_dir.clone())).unwrap();
    assert_eq!(path.as_deref(), Some(cli.as_path()));
    assert_eq!(source, ConfigSource::CliArgument);

    let (path, source) = resolve_settings_path_with(None, env, Some(xdg_dir.clone())).unwrap();
    assert_eq!(path.as_deref(), Some(env_file.as_path()));
    assert_eq!(source, ConfigSource::Environment);

    let only_dir = |key: &str| (key == ENV_CONFIG_DIR).then(|| env_dir_s.clone());
    let (path, source) = resolve_settings_path_with(None, only_dir, Some(xdg_dir.clone())).unwrap();
    assert_eq!(path, Some(env_dir.join(SETTINGS_FILENAME)));
    assert_eq!(source, ConfigSource::Environment);

    let (path, source) = resolve_settings_path_with(None, |_| None, Some(xdg_dir.clone())).unwrap();
    assert_eq!(path, Some(xdg_dir.join(SETTINGS_FILENAME)));
    assert_eq!(source, ConfigSource::XdgConfig);
}

#[test]
fn settings_file_round_trip_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        SETTINGS_FILENAME,
        "[simulation]\nbaseline_seed = 9\nwrite_live_log = false\n",
    );
    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.simulation.baseline_seed, Some(9));
    assert!(!settings.simulation.write_live_log);
}
