//! Command execution
//!
//! This module describes the external command a task runs and the seam
//! through which it is spawned.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::Context;
use std::fmt;
use std::process::{Command as StdCommand, Stdio};

/// Program that builds and uploads the package
pub const PACKAGING_PROGRAM: &str = "python";

/// Arguments passed to the packaging program
pub const DISTRIBUTE_ARGS: &[&str] = &[
    "setup.py",
    "sdist",
    "bdist_wheel",
    "--universal",
    "upload",
];

/// An external program together with its argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The packaging command run by the `distribute` task
    pub fn distribute() -> Self {
        Self::new(PACKAGING_PROGRAM, DISTRIBUTE_ARGS.iter().copied())
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Starts an invocation and waits for it to finish
///
/// Returns the child's exit code, or `None` when the child was terminated
/// without one (killed by a signal).
pub trait Spawner {
    fn spawn(&mut self, invocation: &Invocation, ctx: &Context) -> ExecutionResult<Option<i32>>;
}

/// Spawns real child processes with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSpawner;

impl Spawner for ProcessSpawner {
    fn spawn(&mut self, invocation: &Invocation, ctx: &Context) -> ExecutionResult<Option<i32>> {
        let mut command = StdCommand::new(&invocation.program);
        command.args(&invocation.args);
        command.current_dir(&ctx.working_dir);

        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());

        // Added on top of the inherited environment
        command.envs(&ctx.env);

        let status = command.status().map_err(|source| ExecutionError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        Ok(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_distribute_invocation() {
        let inv = Invocation::distribute();
        assert_eq!(
            inv.argv(),
            vec!["python", "setup.py", "sdist", "bdist_wheel", "--universal", "upload"]
        );
    }

    #[test]
    fn test_display_joins_argv() {
        let inv = Invocation::new("echo", ["a", "b"]);
        assert_eq!(inv.to_string(), "echo a b");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_spawner_success() {
        let ctx = Context::new();
        let code = ProcessSpawner.spawn(&Invocation::new("true", Vec::<String>::new()), &ctx);
        assert_eq!(code.unwrap(), Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_spawner_reports_exit_code() {
        let ctx = Context::new();
        let inv = Invocation::new("sh", ["-c", "exit 7"]);
        assert_eq!(ProcessSpawner.spawn(&inv, &ctx).unwrap(), Some(7));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_spawner_passes_env_and_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut env = BTreeMap::new();
        env.insert("PKGTASK_TEST_VALUE".to_string(), "42".to_string());

        let ctx = Context::new()
            .with_working_dir(dir.path().to_path_buf())
            .with_env(env);
        let inv = Invocation::new("sh", ["-c", "echo \"$PKGTASK_TEST_VALUE\" > out.txt"]);

        assert_eq!(ProcessSpawner.spawn(&inv, &ctx).unwrap(), Some(0));
        let written = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(written.trim(), "42");
    }

    #[test]
    fn test_process_spawner_missing_program() {
        let ctx = Context::new();
        let inv = Invocation::new("pkgtask-no-such-program", Vec::<String>::new());

        let result = ProcessSpawner.spawn(&inv, &ctx);
        assert!(matches!(result, Err(ExecutionError::Spawn { .. })));
    }
}
