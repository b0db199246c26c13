//! Scaleway credential profiles and the CLI configuration file.
//!
//! Profiles come from two places: the Scaleway CLI `config.yaml` and the
//! `SCW_*` environment variables. [`Profile::merge`] combines them field by
//! field.

mod store;

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::config::EnvironmentSnapshot;
use crate::validation::is_region;

pub use store::{ConfigFileLoader, FsConfigLoader, ProfileError, default_config_path};

/// Credential and locality settings, every field optional until validated.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Profile {
    /// Access key (`SCW...`).
    #[serde(default)]
    pub access_key: Option<String>,
    /// Secret key (UUID).
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Organization identifier (UUID).
    #[serde(default)]
    pub default_organization_id: Option<String>,
    /// Default availability zone.
    #[serde(default)]
    pub default_zone: Option<String>,
    /// Default region.
    #[serde(default)]
    pub default_region: Option<String>,
}

impl Profile {
    /// Builds the profile described by the `SCW_*` variables of `env`.
    #[must_use]
    pub fn from_environment(env: &EnvironmentSnapshot) -> Self {
        let scw = &env.scaleway;
        Self {
            access_key: scw.access_key.clone(),
            secret_key: scw.secret_key.clone(),
            default_organization_id: scw.default_organization_id.clone(),
            default_zone: scw.default_zone.clone(),
            default_region: scw.default_region.clone(),
        }
    }

    /// Merges two profiles: each non-empty field of `high` wins, otherwise
    /// the field of `low` is kept.
    #[must_use]
    pub fn merge(high: &Self, low: &Self) -> Self {
        Self {
            access_key: pick(high.access_key.as_ref(), low.access_key.as_ref()),
            secret_key: pick(high.secret_key.as_ref(), low.secret_key.as_ref()),
            default_organization_id: pick(
                high.default_organization_id.as_ref(),
                low.default_organization_id.as_ref(),
            ),
            default_zone: pick(high.default_zone.as_ref(), low.default_zone.as_ref()),
            default_region: pick(high.default_region.as_ref(), low.default_region.as_ref()),
        }
    }

    /// Fills an empty region from the zone by dropping the zone's two-character
    /// numeric suffix. A derived value that is not a known region is
    /// discarded and the region stays unset.
    pub fn derive_region_from_zone(&mut self) {
        if is_set(self.default_region.as_ref()) {
            return;
        }
        let Some(zone) = self.default_zone.as_deref().filter(|zone| !zone.is_empty()) else {
            return;
        };

        debug!(zone, "guessing region from zone");
        let candidate = zone
            .len()
            .checked_sub(2)
            .and_then(|end| zone.get(..end))
            .unwrap_or_default();
        if is_region(candidate) {
            self.default_region = Some(candidate.to_owned());
        } else {
            debug!(region = candidate, "discarding invalid guessed region");
        }
    }
}

fn is_set(value: Option<&String>) -> bool {
    value.is_some_and(|inner| !inner.is_empty())
}

fn pick(high: Option<&String>, low: Option<&String>) -> Option<String> {
    if is_set(high) {
        high.cloned()
    } else {
        low.cloned()
    }
}

/// Profile name that always selects the top-level fields of `config.yaml`.
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Contents of the Scaleway CLI `config.yaml`.
///
/// The top-level fields form the default profile; `profiles` holds named
/// profiles layered on top of it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ConfigFile {
    /// Default profile.
    #[serde(flatten)]
    pub default_profile: Profile,
    /// Profile the CLI activates when none is requested.
    #[serde(default)]
    pub active_profile: Option<String>,
    /// Named profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl ConfigFile {
    /// Selects a profile. A missing or empty name falls back to
    /// `active_profile`, then to the default profile. The name `default`
    /// always denotes the top-level profile; any other name is merged on top
    /// of it.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::ProfileNotFound`] when the requested or active
    /// profile is not declared in the file.
    pub fn profile(&self, name: Option<&str>) -> Result<Profile, ProfileError> {
        let requested = name.filter(|inner| !inner.is_empty()).or_else(|| {
            self.active_profile
                .as_deref()
                .filter(|inner| !inner.is_empty())
        });
        let Some(selected) = requested.filter(|inner| *inner != DEFAULT_PROFILE_NAME) else {
            return Ok(self.default_profile.clone());
        };
        self.profiles
            .get(selected)
            .map(|named| Profile::merge(named, &self.default_profile))
            .ok_or_else(|| ProfileError::ProfileNotFound {
                name: selected.to_owned(),
            })
    }
}
