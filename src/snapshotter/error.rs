//! Error type for [`super::VolumeSnapshotter`].

use thiserror::Error;

use crate::block::BlockApiError;
use crate::client::ClientConfigError;
use crate::config::EnvironmentError;
use crate::persistent_volume::PersistentVolumeError;

/// Errors raised while configuring or running the volume snapshotter.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SnapshotterError {
    /// The plugin configuration contains keys the snapshotter does not know.
    #[error("unknown configuration keys: {}; accepted keys are region, configPath and profile", keys.join(", "))]
    UnknownConfigKeys {
        /// Offending keys in sorted order.
        keys: Vec<String>,
    },
    /// The plugin configuration has no region.
    #[error("missing region in scw configuration")]
    MissingRegion,
    /// The environment could not be read.
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    /// The client configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ClientConfigError),
    /// A caller-supplied zone is not a Scaleway zone.
    #[error("invalid zone {zone}")]
    InvalidZone {
        /// Zone as supplied.
        zone: String,
    },
    /// A Block Storage API call failed.
    #[error(transparent)]
    Api(#[from] BlockApiError),
    /// The PersistentVolume belongs to another CSI driver.
    #[error("unable to handle CSI driver: {driver}")]
    UnsupportedCsiDriver {
        /// Driver named in the document.
        driver: String,
    },
    /// The PersistentVolume has no CSI section.
    #[error("spec.csi not found")]
    MissingCsi,
    /// The PersistentVolume document is malformed.
    #[error("invalid PersistentVolume document: {message}")]
    Document {
        /// Error message from the decoder or encoder.
        message: String,
    },
}

impl From<PersistentVolumeError> for SnapshotterError {
    fn from(err: PersistentVolumeError) -> Self {
        match err {
            PersistentVolumeError::Document { message } => Self::Document { message },
            PersistentVolumeError::UnsupportedCsiDriver { driver } => {
                Self::UnsupportedCsiDriver { driver }
            }
            PersistentVolumeError::MissingCsi => Self::MissingCsi,
        }
    }
}
