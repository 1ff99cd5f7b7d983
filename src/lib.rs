//! cmdx: build and run command lines from structured flag options.
//!
//! ```
//! use cmdx::{FlagMapping, OptionItem};
//!
//! let line = cmdx::build(
//!     "docker",
//!     [OptionItem::from("run"), FlagMapping::new().flag("rm", true).into(), "hello-world".into()],
//! );
//! assert_eq!(line, "docker run --rm hello-world");
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod format;
pub mod npm;
pub mod option;
pub mod output;
pub mod process;
pub mod runner;

pub use config::{CommandConfig, CommandOverrides};
pub use error::{ConfigError, ExecError};
pub use format::{flatten_flags, format_options, ControlKeys, FormattedArgs, Transform};
pub use npm::Npm;
pub use option::{FlagMapping, FlagValue, OptionItem, SequenceElement};
pub use runner::CommandRunner;

/// Creates a command runner rooted at the current directory.
pub fn command(name: impl Into<String>, overrides: CommandOverrides) -> CommandRunner {
    CommandRunner::with_overrides(name, &overrides)
}

/// Formats a command line with default configuration.
pub fn build<I>(name: &str, options: I) -> String
where
    I: IntoIterator,
    I::Item: Into<OptionItem>,
{
    command(name, CommandOverrides::default()).build(options)
}

/// Formats only the arguments, using default flattening.
pub fn build_args<I>(options: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<OptionItem>,
{
    let items: Vec<OptionItem> = options.into_iter().map(Into::into).collect();
    format_options(&items, flatten_flags).args
}

/// Runs a command with default configuration.
pub async fn exec<I>(name: &str, options: I) -> Result<(), ExecError>
where
    I: IntoIterator,
    I::Item: Into<OptionItem>,
{
    command(name, CommandOverrides::default()).exec(options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build() {
        let line = build(
            "docker",
            [OptionItem::from("run"), FlagMapping::new().flag("rm", true).into(), "hello-world".into()],
        );
        assert_eq!(line, "docker run --rm hello-world");
    }

    #[test]
    fn test_build_from_sequence() {
        let line = build(
            "docker",
            [OptionItem::sequence([
                SequenceElement::from("run"),
                FlagMapping::new().flag("h", true).into(),
                FlagMapping::new().flag("name", "value").into(),
                FlagMapping::new().flag("n", "v").into(),
                "hello-world".into(),
            ])],
        );
        assert_eq!(line, "docker run -h --name value -n v hello-world");
    }

    #[test]
    fn test_build_multiple_flags_in_one_mapping() {
        let line = build(
            "docker",
            [
                OptionItem::from("run"),
                FlagMapping::new().flag("h", true).flag("name", "value").flag("n", "v").into(),
                "hello-world".into(),
            ],
        );
        assert_eq!(line, "docker run -h --name value -n v hello-world");
    }

    #[test]
    fn test_build_args() {
        let args = build_args([
            OptionItem::from("run"),
            FlagMapping::new().flag("rm", true).into(),
            "hello-world".into(),
        ]);
        assert_eq!(args, vec!["run", "--rm", "hello-world"]);
    }

    #[test]
    fn test_command_overrides() {
        let cmd = command("npm", CommandOverrides::default().quiet(true));
        assert!(cmd.config().quiet);
        assert!(cmd.config().print_command);
    }

    #[tokio::test]
    async fn test_exec_missing_cwd() {
        let err = exec(
            "npm",
            [
                OptionItem::from(FlagMapping::new().flag("cwd", "/home/user/workspace/my-npm-project")),
                "install".into(),
            ],
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "the specified working directory does not exist: /home/user/workspace/my-npm-project"
        );
    }
}
