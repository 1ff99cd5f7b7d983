//! Command runner: a program name bound to default configuration.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::builder::build_command;
use crate::config::{CommandConfig, CommandOverrides};
use crate::error::ExecError;
use crate::format::{default_transform, format_options, ControlKeys, FormattedArgs, Transform};
use crate::option::{FlagMapping, OptionItem};
use crate::process::Invocation;

/// Handle bound to one executable and its default configuration.
///
/// The first option item of a call may carry `cwd`, `quiet` and
/// `printCommand`, which override the defaults for that call only.
#[derive(Clone)]
pub struct CommandRunner {
    name: String,
    config: CommandConfig,
    transform: Transform,
}

impl CommandRunner {
    pub fn new(name: impl Into<String>, config: CommandConfig) -> Self {
        Self {
            name: name.into(),
            config,
            transform: default_transform(),
        }
    }

    /// Runner rooted at the process's current directory, with `overrides`
    /// applied. Falls back to `.` if the current directory is unreadable.
    pub fn with_overrides(name: impl Into<String>, overrides: &CommandOverrides) -> Self {
        let base = CommandConfig::from_current_dir().unwrap_or_else(|_| CommandConfig::new("."));
        Self::new(name, overrides.apply_to(base))
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&FlagMapping) -> Vec<String> + Send + Sync + 'static,
    {
        self.set_transform(transform);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CommandConfig {
        &mut self.config
    }

    /// Current flattening strategy for the first option item; a replacement
    /// can hold on to it and delegate.
    pub fn transform(&self) -> Transform {
        Arc::clone(&self.transform)
    }

    pub fn set_transform<F>(&mut self, transform: F)
    where
        F: Fn(&FlagMapping) -> Vec<String> + Send + Sync + 'static,
    {
        self.transform = Arc::new(transform);
    }

    fn format<I>(&self, options: I) -> FormattedArgs
    where
        I: IntoIterator,
        I::Item: Into<OptionItem>,
    {
        let items: Vec<OptionItem> = options.into_iter().map(Into::into).collect();
        format_options(&items, self.transform.as_ref())
    }

    pub fn build_args<I>(&self, options: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: Into<OptionItem>,
    {
        self.format(options).args
    }

    /// Formats the command line without running anything.
    pub fn build<I>(&self, options: I) -> String
    where
        I: IntoIterator,
        I::Item: Into<OptionItem>,
    {
        build_command(&self.name, &self.build_args(options))
    }

    /// Formats and runs the command, resolving per-call control keys against
    /// the runner's defaults.
    pub async fn exec<I>(&self, options: I) -> Result<(), ExecError>
    where
        I: IntoIterator,
        I::Item: Into<OptionItem>,
    {
        let FormattedArgs { args, control } = self.format(options);

        let CallSettings {
            cwd,
            quiet,
            print_command,
        } = resolve(control, &self.config);

        let command_line = build_command(&self.name, &args);
        if !quiet && print_command {
            println!("$ {}", command_line);
        }
        debug!(command = %command_line, cwd = %cwd.display(), quiet, "executing command");

        Invocation::new(self.name.as_str(), cwd)
            .args(args)
            .quiet(quiet)
            .run()
            .await
    }
}

/// Settings in effect for one `exec` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSettings {
    pub cwd: PathBuf,
    pub quiet: bool,
    pub print_command: bool,
}

/// Control keys from the call win over the runner defaults; an empty `cwd`
/// counts as unset.
pub fn resolve(control: ControlKeys, config: &CommandConfig) -> CallSettings {
    CallSettings {
        cwd: control
            .cwd
            .filter(|cwd| !cwd.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| config.working_directory.clone()),
        quiet: control.quiet.unwrap_or(config.quiet),
        print_command: control.print_command.unwrap_or(config.print_command),
    }
}

impl fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRunner")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
