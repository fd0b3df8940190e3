use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Environment variable naming a settings file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "NEXTSTRAP_CONFIG";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error while loading settings")]
    #[diagnostic(code(nextstrap::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(nextstrap::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// User defaults read from a TOML settings file. Command line values take precedence.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub package_manager: Option<String>,
    pub project_name: Option<String>,
    pub install: Option<bool>,
    pub template: Option<String>,
}
impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        toml::from_str(&content).map_err(|err| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })
    }

    /// Loads settings from `explicit`, else from [`CONFIG_ENV_VAR`], else returns defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) => {
                log::debug!("loading settings from {}", path.display());
                Settings::from_file(path)
            }
            None => Ok(Settings::default()),
        }
    }
}
