//! Layered resolution of the Scaleway client configuration.
//!
//! Sources, highest priority first: the caller's region override (region
//! only), `SCW_*` environment variables, the selected profile of the Scaleway
//! CLI config file. Nothing is defaulted except the region, which may be
//! derived from the zone.

mod error;

use camino::Utf8PathBuf;
use tracing::debug;

use crate::config::EnvironmentSnapshot;
use crate::profile::{ConfigFileLoader, FsConfigLoader, Profile, ProfileError, default_config_path};
use crate::validation::{
    Region, Zone, is_access_key, is_organization_id, is_region, is_secret_key, is_zone,
};

pub use error::{ClientConfigError, ConfigField};

/// Fully validated client configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientConfig {
    /// Access key (`SCW...`).
    pub access_key: String,
    /// Secret key, also used as the API token.
    pub secret_key: String,
    /// Organization identifier.
    pub organization_id: String,
    /// Default availability zone.
    pub zone: Zone,
    /// Default region.
    pub region: Region,
}

/// Inputs of a single resolution.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResolveRequest {
    /// Config file location; defaults to [`default_config_path`].
    pub config_path: Option<Utf8PathBuf>,
    /// Profile to select from the config file.
    pub profile_name: Option<String>,
    /// Region override applied after every other source.
    pub region: Option<String>,
}

/// Resolves a [`ClientConfig`] from an environment snapshot and a config file
/// loader.
#[derive(Clone, Debug)]
pub struct ClientConfigResolver<L = FsConfigLoader> {
    environment: EnvironmentSnapshot,
    loader: L,
}

impl ClientConfigResolver<FsConfigLoader> {
    /// Creates a resolver reading config files from disk.
    #[must_use]
    pub const fn new(environment: EnvironmentSnapshot) -> Self {
        Self::with_loader(environment, FsConfigLoader)
    }
}

impl<L: ConfigFileLoader> ClientConfigResolver<L> {
    /// Creates a resolver using a custom config file loader.
    #[must_use]
    pub const fn with_loader(environment: EnvironmentSnapshot, loader: L) -> Self {
        Self {
            environment,
            loader,
        }
    }

    /// Resolves and validates the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientConfigError::ConfigFile`] when the config file exists
    /// but cannot be read, parsed, or lacks the requested profile.
    /// Returns [`ClientConfigError::FieldInvalid`] when the selected file
    /// profile or the merged result holds a malformed value, and
    /// [`ClientConfigError::FieldRequired`] when a mandatory field is missing.
    pub fn resolve(&self, request: &ResolveRequest) -> Result<ClientConfig, ClientConfigError> {
        let env_profile = Profile::from_environment(&self.environment);
        let mut profile = match self.load_file_profile(request)? {
            Some(file_profile) => {
                validate_present(&file_profile)?;
                Profile::merge(&env_profile, &file_profile)
            }
            None => env_profile,
        };

        profile.derive_region_from_zone();

        if let Some(region) = request.region.as_deref().filter(|value| !value.is_empty()) {
            profile.default_region = Some(region.to_owned());
        }

        build_client_config(&profile)
    }

    fn load_file_profile(
        &self,
        request: &ResolveRequest,
    ) -> Result<Option<Profile>, ClientConfigError> {
        let Some(path) = request
            .config_path
            .clone()
            .or_else(|| default_config_path(&self.environment))
        else {
            debug!("no config file location available, using environment only");
            return Ok(None);
        };

        match self.loader.load(&path) {
            Ok(file) => Ok(Some(file.profile(request.profile_name.as_deref())?)),
            Err(ProfileError::NotFound { path: missing }) => {
                debug!(path = %missing, "config file not found, using environment only");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Checks every mandatory field in order and converts the profile into a
/// [`ClientConfig`].
fn build_client_config(profile: &Profile) -> Result<ClientConfig, ClientConfigError> {
    let access_key = require(ConfigField::AccessKey, profile.access_key.as_deref())?;
    check(ConfigField::AccessKey, access_key)?;
    let secret_key = require(ConfigField::SecretKey, profile.secret_key.as_deref())?;
    check(ConfigField::SecretKey, secret_key)?;
    let organization_id = require(
        ConfigField::OrganizationId,
        profile.default_organization_id.as_deref(),
    )?;
    check(ConfigField::OrganizationId, organization_id)?;
    let zone_value = require(ConfigField::Zone, profile.default_zone.as_deref())?;
    let zone = zone_value
        .parse::<Zone>()
        .map_err(|err| invalid(ConfigField::Zone, &err.value))?;
    let region_value = require(ConfigField::Region, profile.default_region.as_deref())?;
    let region = region_value
        .parse::<Region>()
        .map_err(|err| invalid(ConfigField::Region, &err.value))?;

    Ok(ClientConfig {
        access_key: access_key.to_owned(),
        secret_key: secret_key.to_owned(),
        organization_id: organization_id.to_owned(),
        zone,
        region,
    })
}

/// Rejects malformed values that are present, ignoring missing ones.
fn validate_present(profile: &Profile) -> Result<(), ClientConfigError> {
    let fields = [
        (ConfigField::AccessKey, profile.access_key.as_deref()),
        (ConfigField::SecretKey, profile.secret_key.as_deref()),
        (
            ConfigField::OrganizationId,
            profile.default_organization_id.as_deref(),
        ),
        (ConfigField::Zone, profile.default_zone.as_deref()),
        (ConfigField::Region, profile.default_region.as_deref()),
    ];
    for (field, value) in fields {
        if let Some(present) = value.filter(|inner| !inner.is_empty()) {
            check(field, present)?;
        }
    }
    Ok(())
}

fn require(field: ConfigField, value: Option<&str>) -> Result<&str, ClientConfigError> {
    value
        .filter(|inner| !inner.is_empty())
        .ok_or(ClientConfigError::FieldRequired { field })
}

fn check(field: ConfigField, value: &str) -> Result<(), ClientConfigError> {
    let valid = match field {
        ConfigField::AccessKey => is_access_key(value),
        ConfigField::SecretKey => is_secret_key(value),
        ConfigField::OrganizationId => is_organization_id(value),
        ConfigField::Zone => is_zone(value),
        ConfigField::Region => is_region(value),
    };
    if valid {
        Ok(())
    } else {
        Err(invalid(field, value))
    }
}

fn invalid(field: ConfigField, value: &str) -> ClientConfigError {
    ClientConfigError::FieldInvalid {
        field,
        value: value.to_owned(),
    }
}

#[cfg(test)]
mod tests;
