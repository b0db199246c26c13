//! Reading the Scaleway CLI configuration file from disk.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

use super::ConfigFile;
use crate::config::EnvironmentSnapshot;

const SCW_DIR: &str = "scw";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Errors raised while loading profiles.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ProfileError {
    /// The configuration file does not exist. Callers treat this as an empty
    /// configuration.
    #[error("configuration file not found at {path}")]
    NotFound {
        /// Path that was probed.
        path: Utf8PathBuf,
    },
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the file is not valid YAML or has an unexpected shape.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Path that could not be parsed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the requested profile is not declared in the file.
    #[error("given profile {name} does not exist")]
    ProfileNotFound {
        /// Requested profile name.
        name: String,
    },
}

/// Source of parsed configuration files, injected into the resolver.
pub trait ConfigFileLoader {
    /// Loads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotFound`] when nothing exists at `path`, and
    /// other [`ProfileError`] variants for read or parse failures.
    fn load(&self, path: &Utf8Path) -> Result<ConfigFile, ProfileError>;
}

/// Loads configuration files through `cap-std`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsConfigLoader;

impl ConfigFileLoader for FsConfigLoader {
    fn load(&self, path: &Utf8Path) -> Result<ConfigFile, ProfileError> {
        let contents = read_config(path)?;
        parse_config(path, &contents)
    }
}

/// Resolves the default config file location: `SCW_CONFIG_PATH`, then
/// `$XDG_CONFIG_HOME/scw/config.yaml`, then `$HOME/.config/scw/config.yaml`.
#[must_use]
pub fn default_config_path(env: &EnvironmentSnapshot) -> Option<Utf8PathBuf> {
    if let Some(path) = &env.scw_config_path {
        return Some(path.clone());
    }
    if let Some(xdg) = &env.xdg_config_home {
        return Some(xdg.join(SCW_DIR).join(CONFIG_FILE_NAME));
    }
    env.home
        .as_ref()
        .map(|home| home.join(".config").join(SCW_DIR).join(CONFIG_FILE_NAME))
}

fn read_config(path: &Utf8Path) -> Result<String, ProfileError> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| ProfileError::Io {
        path: path.to_path_buf(),
        message: String::from("configuration file path is missing a filename"),
    })?;

    let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ProfileError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(err) => {
            return Err(ProfileError::Io {
                path: parent.to_path_buf(),
                message: err.to_string(),
            });
        }
    };

    dir.read_to_string(file_name).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            ProfileError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ProfileError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    })
}

pub(super) fn parse_config(path: &Utf8Path, contents: &str) -> Result<ConfigFile, ProfileError> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(contents).map_err(|err| ProfileError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
