//! Volume snapshot lifecycle on Scaleway Block Storage.
//!
//! [`VolumeSnapshotter`] backs the Velero volume snapshotter plugin. Every
//! operation re-reads remote state and issues one request per step; nothing
//! is cached between calls and nothing is retried.

mod error;

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde_json::Value;
use tracing::{debug, info};

use crate::block::{
    BlockApiError, BlockStorageApi, CreateSnapshotRequest, CreateVolumeRequest, FromSnapshot,
    HttpBlockApi,
};
use crate::client::{ClientConfig, ClientConfigResolver, ResolveRequest};
use crate::config::{EnvironmentSnapshot, non_blank};
use crate::persistent_volume;
use crate::tags::{TagSet, rewrite_ownership};
use crate::validation::Zone;

pub use error::SnapshotterError;

/// Plugin configuration key holding the region.
pub const REGION_KEY: &str = "region";
/// Plugin configuration key holding the Scaleway config file path.
pub const CONFIG_PATH_KEY: &str = "configPath";
/// Plugin configuration key holding the profile name.
pub const PROFILE_KEY: &str = "profile";

const ACCEPTED_KEYS: [&str; 3] = [REGION_KEY, CONFIG_PATH_KEY, PROFILE_KEY];

/// Validated plugin configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SnapshotterSettings {
    /// Region the snapshotter operates in.
    pub region: String,
    /// Explicit Scaleway config file.
    pub config_path: Option<Utf8PathBuf>,
    /// Profile selected from the config file.
    pub profile: Option<String>,
}

impl SnapshotterSettings {
    /// Validates the key/value configuration handed over by Velero.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotterError::UnknownConfigKeys`] when the map holds keys
    /// other than `region`, `configPath` and `profile`, and
    /// [`SnapshotterError::MissingRegion`] when `region` is absent or blank.
    pub fn from_map(config: &BTreeMap<String, String>) -> Result<Self, SnapshotterError> {
        let unknown: Vec<String> = config
            .keys()
            .filter(|key| !ACCEPTED_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(SnapshotterError::UnknownConfigKeys { keys: unknown });
        }

        let lookup = |key: &str| non_blank(config.get(key).map(String::as_str));
        let region = lookup(REGION_KEY).ok_or(SnapshotterError::MissingRegion)?;

        Ok(Self {
            region: region.to_owned(),
            config_path: lookup(CONFIG_PATH_KEY).map(Utf8PathBuf::from),
            profile: lookup(PROFILE_KEY).map(str::to_owned),
        })
    }

    /// Resolution request carrying these settings.
    #[must_use]
    pub fn resolve_request(&self) -> ResolveRequest {
        ResolveRequest {
            config_path: self.config_path.clone(),
            profile_name: self.profile.clone(),
            region: Some(self.region.clone()),
        }
    }
}

/// Type and performance of a volume.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeInfo {
    /// Volume type, for example `sbs_5k`.
    pub volume_type: String,
    /// Provisioned IOPS, absent when the volume reports no specs.
    pub iops: Option<i64>,
}

/// Creates, describes and deletes Block Storage snapshots and volumes.
#[derive(Clone, Debug)]
pub struct VolumeSnapshotter<A = HttpBlockApi> {
    config: ClientConfig,
    api: A,
    cluster_name: Option<String>,
}

impl VolumeSnapshotter<HttpBlockApi> {
    /// Resolves the client configuration and connects to the public API.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotterError::Config`] when no valid client configuration
    /// can be resolved.
    pub fn init(
        settings: &SnapshotterSettings,
        environment: EnvironmentSnapshot,
    ) -> Result<Self, SnapshotterError> {
        let cluster_name = environment.cluster_name().map(str::to_owned);
        let config =
            ClientConfigResolver::new(environment).resolve(&settings.resolve_request())?;
        info!(
            zone = config.zone.as_str(),
            region = config.region.as_str(),
            "volume snapshotter initialised"
        );
        let api = HttpBlockApi::new(config.secret_key.clone());
        Ok(Self::with_api(config, api, cluster_name))
    }

    /// Validates a Velero configuration map, captures the process environment
    /// and initialises the snapshotter.
    ///
    /// # Errors
    ///
    /// Returns any error from [`SnapshotterSettings::from_map`],
    /// [`EnvironmentSnapshot::capture`] or [`Self::init`].
    pub fn from_plugin_config(config: &BTreeMap<String, String>) -> Result<Self, SnapshotterError> {
        let settings = SnapshotterSettings::from_map(config)?;
        let environment = EnvironmentSnapshot::capture()?;
        Self::init(&settings, environment)
    }
}

impl<A: BlockStorageApi> VolumeSnapshotter<A> {
    /// Builds a snapshotter from a resolved configuration and an API client.
    #[must_use]
    pub const fn with_api(config: ClientConfig, api: A, cluster_name: Option<String>) -> Self {
        Self {
            config,
            api,
            cluster_name,
        }
    }

    /// Resolved client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn zone_or_default(&self, zone: &str) -> Result<Zone, SnapshotterError> {
        if zone.trim().is_empty() {
            return Ok(self.config.zone);
        }
        zone.parse().map_err(|_| SnapshotterError::InvalidZone {
            zone: zone.to_owned(),
        })
    }

    /// Restores a new volume from `snapshot_id` in `zone`.
    ///
    /// The snapshot's tags are carried over with cluster ownership re-targeted
    /// at `SCW_CLUSTER_NAME` when it is set. A blank zone selects the default
    /// zone.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotterError::InvalidZone`] for an unknown zone and
    /// [`SnapshotterError::Api`] when the snapshot lookup or volume creation
    /// fails.
    pub async fn create_volume_from_snapshot(
        &self,
        snapshot_id: &str,
        zone: &str,
        iops: Option<u32>,
    ) -> Result<String, SnapshotterError> {
        let target_zone = self.zone_or_default(zone)?;
        let snapshot = self
            .api
            .get_snapshot(target_zone.as_str(), snapshot_id)
            .await
            .inspect_err(|err| info!(snapshot_id, error = %err, "failed to describe snapshot"))?;

        let tags = if snapshot.tags.is_empty() {
            Vec::new()
        } else {
            rewrite_ownership(&snapshot.tags, self.cluster_name.as_deref())
        };

        let request = CreateVolumeRequest {
            zone: target_zone.as_str().to_owned(),
            name: format!("restored-{}", snapshot.name),
            project_id: self.config.organization_id.clone(),
            from_snapshot: FromSnapshot {
                snapshot_id: snapshot_id.to_owned(),
            },
            perf_iops: iops,
            tags,
        };
        let volume = self.api.create_volume(&request).await?;
        info!(
            snapshot_id,
            volume_id = volume.id.as_str(),
            zone = target_zone.as_str(),
            "restored volume from snapshot"
        );
        Ok(volume.id)
    }

    /// Describes the type and IOPS of a volume. A blank zone selects the
    /// default zone.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotterError::InvalidZone`] for an unknown zone and
    /// [`SnapshotterError::Api`] when the lookup fails.
    pub async fn get_volume_info(
        &self,
        volume_id: &str,
        zone: &str,
    ) -> Result<VolumeInfo, SnapshotterError> {
        let target_zone = self.zone_or_default(zone)?;
        let volume = self.api.get_volume(target_zone.as_str(), volume_id).await?;
        let iops = volume
            .specs
            .and_then(|specs| specs.perf_iops)
            .map(i64::from);

        Ok(VolumeInfo {
            volume_type: volume.volume_type,
            iops,
        })
    }

    /// Snapshots `volume_id`, copying its tags merged with `extra_tags`.
    ///
    /// The snapshot is named `vol-<volume name>-snap-<name>` and created in
    /// the volume's zone.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotterError::Api`] when the volume lookup or snapshot
    /// creation fails.
    pub async fn create_snapshot(
        &self,
        volume_id: &str,
        name: &str,
        extra_tags: &[String],
    ) -> Result<String, SnapshotterError> {
        let volume = self
            .api
            .get_volume(self.config.zone.as_str(), volume_id)
            .await
            .inspect_err(|err| info!(volume_id, error = %err, "failed to describe volume"))?;

        let request = CreateSnapshotRequest {
            zone: volume.zone.clone(),
            volume_id: volume.id.clone(),
            name: format!("vol-{}-snap-{name}", volume.name),
            project_id: self.config.organization_id.clone(),
            tags: TagSet::merge(&volume.tags, extra_tags).into_vec(),
        };
        let snapshot = self.api.create_snapshot(&request).await?;
        info!(
            volume_id,
            snapshot_id = snapshot.id.as_str(),
            "created snapshot"
        );
        Ok(snapshot.id)
    }

    /// Deletes a snapshot. A snapshot that is already gone counts as deleted.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotterError::Api`] for every failure other than a
    /// not-found response.
    pub async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), SnapshotterError> {
        match self
            .api
            .delete_snapshot(self.config.zone.as_str(), snapshot_id)
            .await
        {
            Ok(()) => {
                info!(snapshot_id, "deleted snapshot");
                Ok(())
            }
            Err(BlockApiError::NotFound { .. }) => {
                debug!(snapshot_id, "snapshot already absent");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the Block Storage volume ID of a PersistentVolume document.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotterError::Document`] when the document is malformed.
    pub fn get_volume_id(&self, document: &Value) -> Result<String, SnapshotterError> {
        persistent_volume::get_volume_id(document).map_err(SnapshotterError::from)
    }

    /// Points a PersistentVolume document at `volume_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotterError::MissingCsi`],
    /// [`SnapshotterError::UnsupportedCsiDriver`] or
    /// [`SnapshotterError::Document`] when the handle cannot be rewritten.
    pub fn set_volume_id(
        &self,
        document: &Value,
        volume_id: &str,
    ) -> Result<Value, SnapshotterError> {
        persistent_volume::set_volume_id(document, volume_id).map_err(SnapshotterError::from)
    }
}
