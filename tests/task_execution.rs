//! Integration tests for task execution

mod common;

use common::{create_test_config, RecordingSpawner};
use pkgtask::cli::App;
use pkgtask::config::parse_config_file;
use pkgtask::runner::{Context, Invocation, Task, TaskOutcome, Verbosity};
use std::collections::BTreeMap;
use std::fs;

const EXPECTED_ARGV: [&str; 6] = [
    "python",
    "setup.py",
    "sdist",
    "bdist_wheel",
    "--universal",
    "upload",
];

fn silent() -> Context {
    Context::new().with_verbosity(Verbosity::Silent)
}

#[test]
fn test_distribute_spawns_packaging_tool_once() {
    let mut spawner = RecordingSpawner::new(Some(0));
    let mut out = Vec::new();

    let outcome = Task::Distribute
        .execute(&silent(), &mut spawner, &mut out)
        .unwrap();

    assert_eq!(outcome, TaskOutcome::Exited(Some(0)));
    assert_eq!(spawner.calls.len(), 1);
    assert_eq!(spawner.calls[0].0.argv(), EXPECTED_ARGV.to_vec());
}

#[test]
fn test_distribute_argv_is_independent_of_inputs() {
    let mut env = BTreeMap::new();
    env.insert("BUILD".to_string(), "1".to_string());

    let mut spawner = RecordingSpawner::new(Some(0));
    Task::Distribute
        .execute(&silent(), &mut spawner, &mut Vec::new())
        .unwrap();
    Task::Distribute
        .execute(
            &Context::new().with_verbosity(Verbosity::Verbose).with_env(env),
            &mut spawner,
            &mut Vec::new(),
        )
        .unwrap();

    assert_eq!(spawner.calls[0].0, spawner.calls[1].0);
    assert_eq!(spawner.calls[1].0, Invocation::distribute());
}

#[test]
fn test_distribute_reports_nonzero_exit_without_error() {
    let mut spawner = RecordingSpawner::new(Some(1));
    let result = Task::Distribute.execute(&silent(), &mut spawner, &mut Vec::new());

    assert_eq!(result.unwrap().exit_code(), 1);
}

#[test]
fn test_build_doc_output() {
    let mut spawner = RecordingSpawner::new(Some(0));
    let mut out = Vec::new();

    let outcome = Task::BuildDoc
        .execute(&silent(), &mut spawner, &mut out)
        .unwrap();

    assert_eq!(outcome, TaskOutcome::Completed);
    assert_eq!(String::from_utf8(out).unwrap(), "Build Documentation..\n");
    assert!(spawner.calls.is_empty());
}

#[test]
fn test_app_applies_config_to_distribute_context() {
    let (temp_dir, config_path) = create_test_config(
        r#"
project-dir: pkg
dotenv: .env
environment:
  TWINE_PASSWORD: "${TOKEN}"
"#,
    );
    fs::create_dir(temp_dir.path().join("pkg")).unwrap();
    fs::write(temp_dir.path().join(".env"), "TOKEN=s3cret\n").unwrap();

    let config = parse_config_file(&config_path).unwrap();
    let app = App::from_config(config, Some(config_path)).unwrap();

    let mut spawner = RecordingSpawner::new(Some(4));
    let code = app
        .run_with(["pkgtask", "-s", "distribute"], &mut spawner, &mut Vec::new())
        .unwrap();

    assert_eq!(code, 4);
    assert_eq!(spawner.calls.len(), 1);

    let (invocation, ctx) = &spawner.calls[0];
    assert_eq!(invocation.argv(), EXPECTED_ARGV.to_vec());
    assert_eq!(ctx.working_dir, temp_dir.path().join("pkg"));
    assert_eq!(ctx.env.get("TWINE_PASSWORD"), Some(&"s3cret".to_string()));
    assert_eq!(ctx.env.get("TOKEN"), Some(&"s3cret".to_string()));
}

#[test]
fn test_build_doc_ignores_broken_dotenv() {
    let (_temp_dir, config_path) = create_test_config("dotenv: missing.env\n");

    let config = parse_config_file(&config_path).unwrap();
    let app = App::from_config(config, Some(config_path)).unwrap();

    let mut spawner = RecordingSpawner::new(Some(0));
    let mut out = Vec::new();
    let code = app
        .run_with(["pkgtask", "-s", "build-doc"], &mut spawner, &mut out)
        .unwrap();

    assert_eq!(code, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "Build Documentation..\n");
}

#[test]
fn test_distribute_fails_on_missing_project_dir() {
    let (_temp_dir, config_path) = create_test_config("project-dir: nowhere\n");

    let config = parse_config_file(&config_path).unwrap();
    let app = App::from_config(config, Some(config_path)).unwrap();

    let mut spawner = RecordingSpawner::new(Some(0));
    let result = app.run_with(["pkgtask", "distribute"], &mut spawner, &mut Vec::new());

    assert!(result.is_err());
    assert!(spawner.calls.is_empty());
}
