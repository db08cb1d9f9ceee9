//! Integration tests for the command-line layer
//!
//! Argument parsing, config files and the per-file pipeline working together
//! the way `main` drives them.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::path::Path;

use fortdoc::process::{extract_path, write_report_file, write_reports};
use fortdoc::{parse_args_from, Config, SubroutineSet};

const COMM: &str = "\
! Communication layer.
module comm
  ! Point-to-point messaging.
#ifdef MPI
  use mpi
#endif
#ifdef DEBUG
  use checks
#endif
  use kinds
contains
  subroutine send(buf)
    real, intent(in) :: buf(:) ! payload
  end subroutine send
end module comm
";

fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

/// Config the way `main` builds it: file first, then the command line
fn effective_config(config_file: &Path, argv: &[&str]) -> Config {
    let mut config = Config::from_toml_file(config_file).unwrap();
    parse_args_from(argv.iter().copied()).apply_to(&mut config);
    assert_eq!(config.validate(), None);
    config
}

#[test]
fn test_config_file_defines_reach_extraction() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "fortdoc.toml", "defines = [\"MPI\", \"DEBUG\"]\n");
    write_file(dir.path(), "comm.F90", COMM);

    let config = effective_config(&dir.path().join("fortdoc.toml"), &["fortdoc", "comm.F90"]);
    let report = extract_path(&dir.path().join("comm.F90"), &config)
        .unwrap()
        .unwrap();

    let module = report.unit.module("comm").unwrap();
    assert_eq!(module.dependencies, vec!["mpi", "checks", "kinds"]);
    assert_eq!(module.subroutines.names(), vec!["send"]);
}

#[test]
fn test_cli_undefine_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "fortdoc.toml", "defines = [\"MPI\", \"DEBUG\"]\n");
    write_file(dir.path(), "comm.F90", COMM);

    let config = effective_config(
        &dir.path().join("fortdoc.toml"),
        &["fortdoc", "-U", "DEBUG", "comm.F90"],
    );
    assert_eq!(config.defines, vec!["MPI"]);

    let report = extract_path(&dir.path().join("comm.F90"), &config)
        .unwrap()
        .unwrap();
    assert_eq!(
        report.unit.module("comm").unwrap().dependencies,
        vec!["mpi", "kinds"]
    );
}

#[test]
fn test_file_directive_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "fortdoc.toml", "defines = [\"MPI\"]\n");
    write_file(
        dir.path(),
        "comm.F90",
        &format!("! fortdoc: -U MPI -D DEBUG\n{COMM}"),
    );

    let config = effective_config(&dir.path().join("fortdoc.toml"), &["fortdoc"]);
    let report = extract_path(&dir.path().join("comm.F90"), &config)
        .unwrap()
        .unwrap();
    assert_eq!(
        report.unit.module("comm").unwrap().dependencies,
        vec!["checks", "kinds"]
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "fortdoc.toml", "max_file_size = 0\n");

    let config = Config::from_toml_file(&dir.path().join("fortdoc.toml")).unwrap();
    assert!(config.validate().is_some());

    let mut fixed = config;
    parse_args_from(["fortdoc", "--max-file-size", "2048"]).apply_to(&mut fixed);
    assert_eq!(fixed.validate(), None);
}

#[test]
fn test_malformed_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "fortdoc.toml", "defines = [\"MPI\"\n");
    assert!(Config::from_toml_file(&dir.path().join("fortdoc.toml")).is_err());
}

#[test]
fn test_discovered_config_nearest_last() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("src");
    fs::create_dir_all(&nested).unwrap();
    write_file(dir.path(), "fortdoc.toml", "defines = [\"OUTER\"]\n");
    write_file(&nested, "fortdoc.toml", "defines = [\"INNER\"]\n");

    let found = Config::discover_config_files(&nested);
    assert_eq!(found.last(), Some(&nested.join("fortdoc.toml")));

    let config = Config::from_discovered_files(&nested);
    assert!(config.defines.contains(&"OUTER".to_string()));
    assert!(config.defines.contains(&"INNER".to_string()));
}

#[test]
fn test_reports_to_stdout_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "comm.F90", COMM);

    let config = Config::default();
    let report = extract_path(&dir.path().join("comm.F90"), &config)
        .unwrap()
        .unwrap();

    let mut output = Vec::new();
    write_reports(&mut output, std::slice::from_ref(&report), false).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let module = &value[0]["unit"]["modules"][0];
    assert_eq!(module["name"], "comm");
    assert_eq!(value[0]["unit"]["comment"], "Communication layer.");
    assert_eq!(module["comment"], "Point-to-point messaging.");
    let arg = &module["subroutines"][0]["arguments"][0];
    assert_eq!(arg["name"], "buf(:)");
    assert_eq!(arg["type"], "real");
    assert_eq!(arg["comment"], "payload");

    let out_dir = dir.path().join("json");
    let written = write_report_file(&out_dir, &report, false).unwrap();
    assert_eq!(written, out_dir.join("comm.json"));
    let unit: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(unit, value[0]["unit"]);
}
