//! Sub-command shortcuts for `npm`.
//!
//! Each shortcut puts its own name in front of the given options, so the
//! first option item is always a plain word. Control keys in the options
//! that follow are therefore emitted as flags, not consumed.

use crate::config::CommandConfig;
use crate::error::ExecError;
use crate::option::OptionItem;
use crate::runner::CommandRunner;

#[derive(Debug, Clone)]
pub struct Npm {
    runner: CommandRunner,
}

macro_rules! subcommands {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Runs `npm ", stringify!($name), "` with the given options.")]
            pub async fn $name<I>(&self, options: I) -> Result<(), ExecError>
            where
                I: IntoIterator,
                I::Item: Into<OptionItem>,
            {
                self.exec_subcommand(stringify!($name), options).await
            }
        )*
    };
}

impl Npm {
    pub fn new(config: CommandConfig) -> Self {
        Self {
            runner: CommandRunner::new("npm", config),
        }
    }

    pub fn from_runner(runner: CommandRunner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &CommandRunner {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut CommandRunner {
        &mut self.runner
    }

    pub fn build_subcommand<I>(&self, subcommand: &str, options: I) -> String
    where
        I: IntoIterator,
        I::Item: Into<OptionItem>,
    {
        self.runner.build(prepend(subcommand, options))
    }

    pub async fn exec_subcommand<I>(&self, subcommand: &str, options: I) -> Result<(), ExecError>
    where
        I: IntoIterator,
        I::Item: Into<OptionItem>,
    {
        self.runner.exec(prepend(subcommand, options)).await
    }

    subcommands!(
        bin, install, link, list, login, logout, pack, prune, publish, run, test, uninstall,
        unpublish, update, version, whoami,
    );
}

fn prepend<I>(subcommand: &str, options: I) -> Vec<OptionItem>
where
    I: IntoIterator,
    I::Item: Into<OptionItem>,
{
    std::iter::once(OptionItem::from(subcommand))
        .chain(options.into_iter().map(Into::into))
        .collect()
}
