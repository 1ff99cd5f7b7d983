use std::path::PathBuf;

use thiserror::Error;

/// Failures of `exec`.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("the specified working directory does not exist: {}", path.display())]
    MissingWorkingDirectory { path: PathBuf },

    /// Displays the OS error unchanged.
    #[error("{error}")]
    Spawn {
        program: String,
        error: std::io::Error,
    },

    #[error("`{program}` exited with code {code}")]
    Exit { program: String, code: i32 },

    #[error("`{program}` was terminated by a signal")]
    Terminated { program: String, signal: Option<i32> },
}

impl ExecError {
    /// Exit code of the child, when it ran to completion.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::Exit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
