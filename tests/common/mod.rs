//! Common test utilities
#![allow(dead_code)]

use pkgtask::error::ExecutionResult;
use pkgtask::runner::{Context, Invocation, Spawner};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a pkgtask.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("pkgtask.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// A spawner that records invocations and the context they ran under
pub struct RecordingSpawner {
    pub calls: Vec<(Invocation, Context)>,
    pub exit_code: Option<i32>,
}

impl RecordingSpawner {
    pub fn new(exit_code: Option<i32>) -> Self {
        RecordingSpawner {
            calls: Vec::new(),
            exit_code,
        }
    }
}

impl Spawner for RecordingSpawner {
    fn spawn(&mut self, invocation: &Invocation, ctx: &Context) -> ExecutionResult<Option<i32>> {
        self.calls.push((invocation.clone(), ctx.clone()));
        Ok(self.exit_code)
    }
}

/// Write an executable shell script named `python` into `dir`
///
/// The script records its arguments, one per line, in `args.txt` in its
/// working directory, writes `$TWINE_USERNAME` to `env.txt` and exits with
/// `exit_code`.
#[cfg(unix)]
pub fn install_fake_python(dir: &std::path::Path, exit_code: i32) {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("python");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\nfor a in \"$@\"; do echo \"$a\" >> args.txt; done\necho \"$TWINE_USERNAME\" > env.txt\nexit {}\n",
            exit_code
        ),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
}
