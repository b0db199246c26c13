//! Environment snapshot loading via `ortho-config`.
//!
//! The resolver never reads process state itself. Callers capture an
//! [`EnvironmentSnapshot`] once and hand it to the components that need it.

use std::ffi::OsString;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const APP_NAME: &str = "velero-plugin-scaleway";

/// `SCW_*` values consumed by the plugin. Every field is optional; the
/// resolver decides which ones are mandatory.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "SCW",
    discovery(
        app_name = "velero-plugin-scaleway",
        env_var = "VELERO_PLUGIN_SCALEWAY_CONFIG_PATH",
        config_file_name = "velero-plugin-scaleway.toml",
        dotfile_name = ".velero-plugin-scaleway.toml",
        project_file_name = "velero-plugin-scaleway.toml"
    )
)]
pub struct ScalewayEnvironment {
    /// `SCW_ACCESS_KEY`.
    pub access_key: Option<String>,
    /// `SCW_SECRET_KEY`.
    pub secret_key: Option<String>,
    /// `SCW_DEFAULT_ORGANIZATION_ID`.
    pub default_organization_id: Option<String>,
    /// `SCW_DEFAULT_ZONE`.
    pub default_zone: Option<String>,
    /// `SCW_DEFAULT_REGION`.
    pub default_region: Option<String>,
    /// `SCW_S3_ENDPOINT`: object storage endpoint override.
    pub s3_endpoint: Option<String>,
    /// `SCW_REGION`: region used for object storage endpoints.
    pub region: Option<String>,
    /// `SCW_CLUSTER_NAME`: cluster that should own restored volumes.
    pub cluster_name: Option<String>,
}

impl ScalewayEnvironment {
    /// Returns an environment with every variable unset.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            access_key: None,
            secret_key: None,
            default_organization_id: None,
            default_zone: None,
            default_region: None,
            s3_endpoint: None,
            region: None,
            cluster_name: None,
        }
    }

    /// Loads the `SCW_*` variables without parsing CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::Parse`] when the loader fails to merge
    /// sources.
    pub fn load_without_cli_args() -> Result<Self, EnvironmentError> {
        Self::load_from_iter([OsString::from(APP_NAME)])
            .map_err(|err| EnvironmentError::Parse(err.to_string()))
    }
}

/// Frozen view of every environment input the plugin depends on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnvironmentSnapshot {
    /// Prefixed Scaleway variables.
    pub scaleway: ScalewayEnvironment,
    /// `SCW_CONFIG_PATH`: overrides the Scaleway CLI config file location.
    /// Read directly because `ortho-config` reserves `config_path`.
    pub scw_config_path: Option<Utf8PathBuf>,
    /// `XDG_CONFIG_HOME`, used to locate the default config file.
    pub xdg_config_home: Option<Utf8PathBuf>,
    /// `HOME`, the last fallback when locating the config file.
    pub home: Option<Utf8PathBuf>,
}

impl EnvironmentSnapshot {
    /// Captures the current process environment.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] when the `SCW_*` variables cannot be
    /// loaded.
    pub fn capture() -> Result<Self, EnvironmentError> {
        Ok(Self {
            scaleway: ScalewayEnvironment::load_without_cli_args()?,
            scw_config_path: utf8_var("SCW_CONFIG_PATH"),
            xdg_config_home: utf8_var("XDG_CONFIG_HOME"),
            home: utf8_var("HOME"),
        })
    }

    /// Snapshot with nothing set; tests layer values on top.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            scaleway: ScalewayEnvironment::empty(),
            scw_config_path: None,
            xdg_config_home: None,
            home: None,
        }
    }

    /// Cluster name used for ownership tags, ignoring blank values.
    #[must_use]
    pub fn cluster_name(&self) -> Option<&str> {
        non_blank(self.scaleway.cluster_name.as_deref())
    }
}

fn utf8_var(key: &str) -> Option<Utf8PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .map(Utf8PathBuf::from)
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|inner| !inner.trim().is_empty())
}

/// Errors raised while capturing the environment.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum EnvironmentError {
    /// Surfaces errors from the `ortho-config` loader.
    #[error("environment parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for EnvironmentError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::EnvGuard;

    #[tokio::test]
    async fn environment_loads_prefixed_scaleway_variables() {
        let _guard = EnvGuard::set_vars(&[
            ("SCW_ACCESS_KEY", "SCWABCDEFGHIJ0123456"),
            ("SCW_DEFAULT_ZONE", "nl-ams-1"),
            ("SCW_CLUSTER_NAME", "prod"),
        ])
        .await;

        let env = ScalewayEnvironment::load_without_cli_args()
            .unwrap_or_else(|err| panic!("environment should load: {err}"));

        assert_eq!(env.access_key.as_deref(), Some("SCWABCDEFGHIJ0123456"));
        assert_eq!(env.default_zone.as_deref(), Some("nl-ams-1"));
        assert_eq!(env.cluster_name.as_deref(), Some("prod"));
    }

    #[test]
    fn blank_cluster_name_is_ignored() {
        let mut snapshot = EnvironmentSnapshot::empty();
        snapshot.scaleway.cluster_name = Some(String::from("   "));
        assert_eq!(snapshot.cluster_name(), None);

        snapshot.scaleway.cluster_name = Some(String::from("prod"));
        assert_eq!(snapshot.cluster_name(), Some("prod"));
    }
}
