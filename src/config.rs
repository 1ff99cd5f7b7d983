use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Defaults a command runner uses when a call does not override them.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandConfig {
    pub working_directory: PathBuf,
    pub print_command: bool,
    pub quiet: bool,
}

impl CommandConfig {
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            print_command: true,
            quiet: false,
        }
    }

    pub fn from_current_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }
}

/// Partial configuration, as given to `command` or read from a defaults file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOverrides {
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub print_command: Option<bool>,
    #[serde(default)]
    pub quiet: Option<bool>,
}

impl CommandOverrides {
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn print_command(mut self, print_command: bool) -> Self {
        self.print_command = Some(print_command);
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    /// Layers `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: CommandOverrides) -> Self {
        Self {
            cwd: other.cwd.or(self.cwd),
            print_command: other.print_command.or(self.print_command),
            quiet: other.quiet.or(self.quiet),
        }
    }

    pub fn apply_to(&self, mut config: CommandConfig) -> CommandConfig {
        if let Some(cwd) = &self.cwd {
            config.working_directory = cwd.clone();
        }
        if let Some(print_command) = self.print_command {
            config.print_command = print_command;
        }
        if let Some(quiet) = self.quiet {
            config.quiet = quiet;
        }
        config
    }

    /// Looks up the defaults file for `name`; the first existing file wins.
    pub fn load(name: &str) -> Result<Option<CommandOverrides>, ConfigError> {
        for path in config_paths(name) {
            if path.exists() {
                return Self::load_from(&path).map(Some);
            }
        }
        Ok(None)
    }

    pub fn load_from(path: &Path) -> Result<CommandOverrides, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn config_paths(name: &str) -> Vec<PathBuf> {
    let file_name = format!("{}.json", name);
    let mut paths = Vec::new();

    // 1. Project-local: ./.cmdx/<name>.json
    paths.push(PathBuf::from(".cmdx").join(&file_name));

    // 2. User config: ~/.config/cmdx/<name>.json
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("cmdx").join(&file_name));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_defaults() {
        let config = CommandConfig::new("/work");
        assert_eq!(config.working_directory, PathBuf::from("/work"));
        assert!(config.print_command);
        assert!(!config.quiet);
    }

    #[test]
    fn test_apply_overrides() {
        let overrides = CommandOverrides::default().cwd("/other").print_command(false);
        let config = overrides.apply_to(CommandConfig::new("/work"));
        assert_eq!(config.working_directory, PathBuf::from("/other"));
        assert!(!config.print_command);
        assert!(!config.quiet);
    }

    #[test]
    fn test_merge_prefers_other() {
        let file = CommandOverrides::default().cwd("/from-file").quiet(true);
        let cli = CommandOverrides::default().cwd("/from-cli");
        let merged = file.merge(cli);
        assert_eq!(merged.cwd, Some(PathBuf::from("/from-cli")));
        assert_eq!(merged.quiet, Some(true));
        assert_eq!(merged.print_command, None);
    }

    #[test]
    fn test_parse_overrides() {
        let json = r#"{ "cwd": "/home/user/project", "printCommand": false }"#;
        let overrides: CommandOverrides = serde_json::from_str(json).unwrap();
        assert_eq!(overrides.cwd, Some(PathBuf::from("/home/user/project")));
        assert_eq!(overrides.print_command, Some(false));
        assert_eq!(overrides.quiet, None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "quiet": true }}"#).unwrap();
        let overrides = CommandOverrides::load_from(file.path()).unwrap();
        assert_eq!(overrides.quiet, Some(true));
    }

    #[test]
    fn test_load_from_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = CommandOverrides::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_config_paths_project_local_first() {
        let paths = config_paths("npm");
        assert_eq!(paths[0], PathBuf::from(".cmdx/npm.json"));
    }
}
