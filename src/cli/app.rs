//! Main CLI application

use crate::config::{
    load_config, resolve_environment, resolve_project_dir, validate_config_source, Config,
    ConfigSource, LoadedConfig,
};
use crate::error::{ConfigError, PkgtaskError};
use crate::runner::{Context, ProcessSpawner, Spawner, Task, Verbosity};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name of the shell completion subcommand
const COMPLETION_COMMAND: &str = "completion";

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Parsed configuration (defaults when no file applies)
    config: Config,
    /// Config file path and origin, if one was loaded
    config_path: Option<(PathBuf, ConfigSource)>,
}

impl App {
    /// Create a new app, discovering the config file
    pub fn new() -> Result<Self, PkgtaskError> {
        Self::load(None)
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Result<Self, PkgtaskError> {
        Self::load(Some(&path))
    }

    /// Create app from a project configuration read from `config_path`
    pub fn from_config(config: Config, config_path: Option<PathBuf>) -> Result<Self, PkgtaskError> {
        Self::from_source(config, config_path.map(|path| (path, ConfigSource::Project)))
    }

    /// Create app from a loaded config file, or defaults when there is none
    pub fn from_loaded(loaded: Option<LoadedConfig>) -> Result<Self, PkgtaskError> {
        match loaded {
            Some(loaded) => Self::from_source(loaded.config, Some((loaded.path, loaded.source))),
            None => Self::from_source(Config::default(), None),
        }
    }

    fn from_source(
        config: Config,
        config_path: Option<(PathBuf, ConfigSource)>,
    ) -> Result<Self, PkgtaskError> {
        let source = config_path
            .as_ref()
            .map_or(ConfigSource::Project, |(_, source)| *source);
        validate_config_source(&config, source)?;
        let command = build_command(&config);

        Ok(App {
            command,
            config,
            config_path,
        })
    }

    fn load(explicit: Option<&Path>) -> Result<Self, PkgtaskError> {
        Self::from_loaded(load_config(explicit)?)
    }

    /// Run the application with the process arguments, returning the exit code
    pub fn run(self) -> Result<i32, PkgtaskError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with(env::args(), &mut ProcessSpawner, &mut out)
    }

    /// Run the application with explicit arguments, spawner and output
    pub fn run_with<I, T>(
        mut self,
        args: I,
        spawner: &mut dyn Spawner,
        out: &mut dyn Write,
    ) -> Result<i32, PkgtaskError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = match self.command.clone().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) => e.exit(),
        };

        let verbosity = get_verbosity(&matches);

        let (name, sub_matches) = match matches.subcommand() {
            Some((name, sub_matches)) => (name.to_string(), sub_matches),
            None => {
                // No task specified, show help
                write!(out, "{}", self.command.render_help())?;
                writeln!(out)?;
                return Ok(0);
            }
        };

        if name == COMPLETION_COMMAND {
            // clap requires the shell argument, so this never fails
            let shell = sub_matches
                .get_one::<Shell>("shell")
                .copied()
                .ok_or_else(|| ConfigError::Invalid("missing shell".to_string()))?;
            let bin_name = self.command.get_name().to_string();
            clap_complete::generate(shell, &mut self.command, bin_name, out);
            return Ok(0);
        }

        // Subcommands are built from Task::ALL, so every other name is a task
        let task = Task::from_name(&name)
            .ok_or_else(|| ConfigError::Invalid(format!("Task '{}' is not defined", name)))?;

        let ctx = self.build_context(task, verbosity)?;
        let outcome = task.execute(&ctx, spawner, out)?;

        Ok(outcome.exit_code())
    }

    /// Directory relative config paths (such as `dotenv`) resolve against
    fn config_dir(&self) -> PathBuf {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match self.config_path.as_ref().and_then(|(p, _)| p.parent()) {
            Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
            _ => cwd,
        }
    }

    /// Directory `project-dir` resolves against
    ///
    /// The per-user config lives outside any project, so the packaging tool
    /// then runs in the current directory.
    fn project_base_dir(&self) -> PathBuf {
        match &self.config_path {
            Some((_, ConfigSource::User)) => {
                env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }
            _ => self.config_dir(),
        }
    }

    /// Build the execution context for a task
    fn build_context(&self, task: Task, verbosity: Verbosity) -> Result<Context, PkgtaskError> {
        let mut ctx = Context::new().with_verbosity(verbosity);

        if let Some((path, _)) = &self.config_path {
            ctx.print_debug(&format!("Using config file: {}", path.display()));
        }

        // Only the packaging step needs a project directory and environment
        if task == Task::Distribute {
            ctx = ctx
                .with_working_dir(resolve_project_dir(&self.config, &self.project_base_dir())?)
                .with_env(resolve_environment(&self.config, &self.config_dir())?);
        }

        Ok(ctx)
    }
}

/// Build the clap command from configuration
fn build_command(config: &Config) -> Command {
    let mut cmd = Command::new(config.name.clone().unwrap_or_else(|| "pkgtask".to_string()))
        .version(env!("CARGO_PKG_VERSION"))
        .about(config.usage.clone().unwrap_or_else(|| {
            "Build and upload a Python package".to_string()
        }))
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to pkgtask.yml config file")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no diagnostics")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        );

    // Add subcommands for each task
    for task in Task::ALL {
        cmd = cmd.subcommand(
            Command::new(task.name())
                .about(task.usage())
                .long_about(task.description()),
        );
    }

    cmd.subcommand(
        Command::new(COMPLETION_COMMAND)
            .about("Print a shell completion script")
            .arg(
                Arg::new("shell")
                    .value_name("SHELL")
                    .required(true)
                    .value_parser(value_parser!(Shell)),
            ),
    )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<i32, PkgtaskError> {
    // Check if --file flag is provided first
    let args: Vec<String> = env::args().collect();
    let file_path = extract_file_arg(&args);

    let app = if let Some(path) = file_path {
        App::with_config_file(path)?
    } else {
        App::new()?
    };

    app.run()
}

/// Extract --file argument before the config-dependent command is built
///
/// Parses with the default command so every spelling clap accepts
/// (`-f x`, `-fx`, `-sf x`, `--file=x`) is recognised. Parse errors are left
/// for the real parse to report.
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    build_command(&Config::default())
        .ignore_errors(true)
        .try_get_matches_from(args)
        .ok()
        .and_then(|matches| matches.get_one::<String>("file").map(PathBuf::from))
}
