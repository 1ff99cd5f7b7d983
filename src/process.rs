//! Spawning a single child process and mapping its outcome.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::error::ExecError;

/// One process launch: argv-style, no shell involved.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    /// Inherit the parent's stdio when false, discard it when true.
    pub quiet: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            quiet: false,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn to_tokio_command(&self) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(&self.args).current_dir(&self.cwd);

        if self.quiet {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        } else {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }

        cmd
    }

    /// Starts the process and waits for it to exit.
    pub async fn run(&self) -> Result<(), ExecError> {
        if !self.cwd.is_dir() {
            return Err(ExecError::MissingWorkingDirectory {
                path: self.cwd.clone(),
            });
        }

        let mut child = self
            .to_tokio_command()
            .spawn()
            .map_err(|error| self.spawn_error(error))?;
        debug!(program = %self.program, pid = ?child.id(), "process started");

        let status = child
            .wait()
            .await
            .map_err(|error| self.spawn_error(error))?;
        debug!(program = %self.program, %status, "process exited");

        self.check_status(status)
    }

    fn spawn_error(&self, error: io::Error) -> ExecError {
        ExecError::Spawn {
            program: self.program.clone(),
            error,
        }
    }

    fn check_status(&self, status: ExitStatus) -> Result<(), ExecError> {
        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(ExecError::Exit {
                program: self.program.clone(),
                code,
            }),
            None => Err(ExecError::Terminated {
                program: self.program.clone(),
                signal: signal_of(&status),
            }),
        }
    }
}

#[cfg(unix)]
fn signal_of(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: &ExitStatus) -> Option<i32> {
    None
}
