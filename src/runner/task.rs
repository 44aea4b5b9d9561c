//! Task definitions and execution logic

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{Context, Invocation, Spawner};
use std::io::Write;

/// Line printed by the documentation task
pub const BUILD_DOC_MESSAGE: &str = "Build Documentation..";

/// The tasks Pkgtask knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Build an sdist and a universal wheel, then upload them
    Distribute,

    /// Documentation placeholder
    BuildDoc,
}

/// What came of running a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Finished without spawning a process
    Completed,

    /// A child process ran and exited with this code (`None` if it had none)
    Exited(Option<i32>),
}

impl TaskOutcome {
    /// Process exit code the CLI should finish with
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskOutcome::Completed => 0,
            TaskOutcome::Exited(Some(code)) => *code,
            TaskOutcome::Exited(None) => 1,
        }
    }
}

impl Task {
    /// Every task, in help order
    pub const ALL: [Task; 2] = [Task::Distribute, Task::BuildDoc];

    /// Name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Task::Distribute => "distribute",
            Task::BuildDoc => "build-doc",
        }
    }

    /// One-line help text
    pub fn usage(&self) -> &'static str {
        match self {
            Task::Distribute => "Distribute the package",
            Task::BuildDoc => "Build documentation",
        }
    }

    /// Longer help text
    pub fn description(&self) -> String {
        match self {
            Task::Distribute => format!(
                "Build a source distribution and a universal wheel and upload them.\n\nRuns: {}",
                Invocation::distribute()
            ),
            Task::BuildDoc => "Placeholder; prints a message and builds nothing.".to_string(),
        }
    }

    /// Look a task up by its command-line name
    pub fn from_name(name: &str) -> Option<Task> {
        Task::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Execute the task
    ///
    /// Task output goes to `out`; child processes are started through
    /// `spawner`. A nonzero child exit is reported in the outcome, not as an
    /// error.
    pub fn execute(
        &self,
        ctx: &Context,
        spawner: &mut dyn Spawner,
        out: &mut dyn Write,
    ) -> ExecutionResult<TaskOutcome> {
        ctx.print_task_start(self.name());

        let outcome = match self {
            Task::Distribute => {
                let invocation = Invocation::distribute();
                ctx.print_debug(&format!("Working directory: {}", ctx.working_dir.display()));
                if !ctx.env.is_empty() {
                    let keys: Vec<&str> = ctx.env.keys().map(String::as_str).collect();
                    ctx.print_debug(&format!("Extra environment: {}", keys.join(", ")));
                }
                ctx.print_run(&invocation.to_string());

                let code = spawner.spawn(&invocation, ctx)?;
                match code {
                    Some(0) => {}
                    Some(code) => ctx.print_error(&format!("{} exited with code {}", invocation.program, code)),
                    None => ctx.print_error(&format!("{} was terminated by a signal", invocation.program)),
                }
                TaskOutcome::Exited(code)
            }
            Task::BuildDoc => {
                writeln!(out, "{}", BUILD_DOC_MESSAGE).map_err(ExecutionError::Output)?;
                TaskOutcome::Completed
            }
        };

        ctx.print_task_complete(self.name());
        Ok(outcome)
    }
}
