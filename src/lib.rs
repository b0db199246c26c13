//! Backend of the Velero volume snapshotter plugin for Scaleway Block Storage.
//!
//! The crate resolves a validated Scaleway client configuration from the
//! environment, the Scaleway CLI config file and plugin settings, then drives
//! the snapshot lifecycle (snapshot, restore, describe, delete) through the
//! Block Storage API. It also bridges the same credentials to S3-compatible
//! object storage clients.

pub mod block;
pub mod client;
pub mod config;
pub mod object_store;
pub mod persistent_volume;
pub mod profile;
pub mod snapshotter;
pub mod tags;
pub mod test_support;
pub mod validation;

pub use block::{BlockApiError, BlockStorageApi, HttpBlockApi};
pub use client::{ClientConfig, ClientConfigError, ClientConfigResolver, ConfigField, ResolveRequest};
pub use config::{EnvironmentError, EnvironmentSnapshot, ScalewayEnvironment};
pub use object_store::{
    BridgeError, Credentials, CredentialsProvider, EndpointResolver, ObjectStoreConfig,
    ObjectStoreConfigBuilder, check_tags, is_valid_s3_url_scheme,
};
pub use persistent_volume::{PersistentVolumeError, SBS_CSI_DRIVER};
pub use profile::{ConfigFile, Profile, ProfileError};
pub use snapshotter::{SnapshotterError, SnapshotterSettings, VolumeInfo, VolumeSnapshotter};
pub use tags::TagSet;
pub use validation::{Region, Zone};
