//! External process execution
//!
//! Every external command the driver runs is described by an [`Invocation`]
//! and executed through a [`CommandRunner`]. Execution blocks until the child
//! exits; there are no timeouts and no retries.

use std::ffi::OsString;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::CommandError;

/// Where a command's standard output is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdoutLog {
    /// Log file path
    pub path: PathBuf,
    /// Append instead of truncating
    pub append: bool,
}

/// One external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    stdin: Option<String>,
    stdout_log: Option<StdoutLog>,
    path_prefix: Option<PathBuf>,
    check: bool,
}

impl Invocation {
    /// Create a status-checked invocation of `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
            stdout_log: None,
            path_prefix: None,
            check: true,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in this working directory
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Feed this text on standard input
    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Write standard output to `path`, truncating it first
    #[must_use]
    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout_log = Some(StdoutLog {
            path: path.into(),
            append: false,
        });
        self
    }

    /// Append standard output to `path`
    #[must_use]
    pub fn stdout_append(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout_log = Some(StdoutLog {
            path: path.into(),
            append: true,
        });
        self
    }

    /// Search `dir` before the inherited `PATH`
    #[must_use]
    pub fn path_prefix(mut self, dir: impl Into<PathBuf>) -> Self {
        self.path_prefix = Some(dir.into());
        self
    }

    /// Do not treat a non-zero exit as an error
    #[must_use]
    pub fn unchecked(mut self) -> Self {
        self.check = false;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn stdin_input(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    pub fn stdout_log(&self) -> Option<&StdoutLog> {
        self.stdout_log.as_ref()
    }

    pub fn search_path_prefix(&self) -> Option<&Path> {
        self.path_prefix.as_deref()
    }

    pub fn checks_status(&self) -> bool {
        self.check
    }

    /// Effective `PATH` for this invocation given the inherited one
    pub fn search_path(&self, inherited: Option<OsString>) -> Result<OsString, CommandError> {
        let mut dirs: Vec<PathBuf> = self.path_prefix.iter().cloned().collect();
        if let Some(inherited) = inherited {
            dirs.extend(std::env::split_paths(&inherited));
        }
        std::env::join_paths(dirs).map_err(|e| CommandError::Spawn {
            command: self.to_string(),
            error: e.to_string(),
        })
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        if let Some(log) = &self.stdout_log {
            let redirect = if log.append { ">>" } else { ">" };
            write!(f, " {redirect} {}", log.path.display())?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    if word.is_empty() || word.chars().any(char::is_whitespace) {
        format!("'{word}'")
    } else {
        word.to_string()
    }
}

/// Result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (`None` when killed by a signal)
    pub code: Option<i32>,
    /// Captured standard output (empty when redirected to a log)
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with status zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {code}"),
            None => "termination by signal".to_string(),
        }
    }
}

/// Executes invocations
pub trait CommandRunner {
    /// Start the process and wait for it, without interpreting its exit status
    fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError>;

    /// Execute, failing on a non-zero exit unless the invocation is unchecked
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        let output = self.execute(invocation)?;
        if invocation.checks_status() && !output.success() {
            return Err(CommandError::NonZeroExit {
                command: invocation.to_string(),
                status: output.status_text(),
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

/// Runs invocations as child processes of this process
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner
    pub fn new() -> Self {
        Self
    }

    fn open_log(log: &StdoutLog) -> Result<File, CommandError> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .append(log.append)
            .truncate(!log.append)
            .open(&log.path)
            .map_err(|e| CommandError::LogFile {
                path: log.path.clone(),
                error: e.to_string(),
            })
    }
}

impl CommandRunner for SystemRunner {
    fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        tracing::info!("Executing: {invocation}");

        let search_path = invocation.search_path(std::env::var_os("PATH"))?;
        let cwd = match invocation.working_dir() {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(|e| CommandError::Spawn {
                command: invocation.to_string(),
                error: e.to_string(),
            })?,
        };
        let program = which::which_in(invocation.program(), Some(&search_path), &cwd).map_err(
            |_| CommandError::ProgramNotFound {
                program: invocation.program().to_string(),
                search_path: search_path.to_string_lossy().into_owned(),
            },
        )?;

        let mut command = Command::new(&program);
        command
            .args(invocation.arguments())
            .current_dir(&cwd)
            .env("PATH", &search_path)
            .stderr(Stdio::piped());

        match invocation.stdout_log() {
            Some(log) => {
                command.stdout(Self::open_log(log)?);
            }
            None => {
                command.stdout(Stdio::piped());
            }
        }
        if invocation.stdin_input().is_some() {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::null());
        }

        let spawn_error = |e: std::io::Error| CommandError::Spawn {
            command: invocation.to_string(),
            error: e.to_string(),
        };

        let mut child = command.spawn().map_err(spawn_error)?;
        if let (Some(input), Some(mut stdin)) = (invocation.stdin_input(), child.stdin.take()) {
            stdin.write_all(input.as_bytes()).map_err(spawn_error)?;
        }
        let output = child.wait_with_output().map_err(spawn_error)?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!("'{}' finished with {:?}", invocation.program(), result.code);
        if !result.success() && !result.stderr.is_empty() {
            tracing::warn!("{}", result.stderr.trim_end());
        }
        Ok(result)
    }
}
