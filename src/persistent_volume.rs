//! Access to the Block Storage volume handle of a PersistentVolume document.
//!
//! Velero hands the plugin untyped JSON documents. The conversion to and from
//! the typed `k8s-openapi` [`PersistentVolume`] lives only in this module.

use k8s_openapi::api::core::v1::PersistentVolume;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// CSI driver name of Scaleway Block Storage volumes.
pub const SBS_CSI_DRIVER: &str = "sbs-default.csi.scaleway.com";

const VOLUME_ID_PREFIX: &str = "vol-";

/// Errors raised while reading or rewriting a PersistentVolume document.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum PersistentVolumeError {
    /// The document is not a valid PersistentVolume.
    #[error("invalid PersistentVolume document: {message}")]
    Document {
        /// Error message from the decoder or encoder.
        message: String,
    },
    /// The volume was provisioned by another CSI driver.
    #[error("unable to handle CSI driver: {driver}")]
    UnsupportedCsiDriver {
        /// Driver named in `spec.csi.driver`.
        driver: String,
    },
    /// The document has no `spec.csi` section.
    #[error("spec.csi not found")]
    MissingCsi,
}

/// Decodes a generic document into a typed PersistentVolume.
///
/// # Errors
///
/// Returns [`PersistentVolumeError::Document`] when the document does not
/// match the PersistentVolume schema.
pub fn from_document(document: &Value) -> Result<PersistentVolume, PersistentVolumeError> {
    serde_json::from_value(document.clone()).map_err(|err| PersistentVolumeError::Document {
        message: err.to_string(),
    })
}

/// Encodes a typed PersistentVolume back into a generic document.
///
/// # Errors
///
/// Returns [`PersistentVolumeError::Document`] when serialisation fails.
pub fn to_document(volume: &PersistentVolume) -> Result<Value, PersistentVolumeError> {
    serde_json::to_value(volume).map_err(|err| PersistentVolumeError::Document {
        message: err.to_string(),
    })
}

/// Returns the Block Storage volume ID embedded in the CSI volume handle.
///
/// Volumes without a CSI section, or provisioned by another driver, yield an
/// empty ID rather than an error.
///
/// # Errors
///
/// Returns [`PersistentVolumeError::Document`] when the document cannot be
/// decoded.
pub fn get_volume_id(document: &Value) -> Result<String, PersistentVolumeError> {
    let volume = from_document(document)?;
    let Some(csi) = volume.spec.as_ref().and_then(|spec| spec.csi.as_ref()) else {
        return Ok(String::new());
    };
    if csi.driver != SBS_CSI_DRIVER {
        info!(driver = csi.driver.as_str(), "unable to handle CSI driver");
        return Ok(String::new());
    }

    Ok(csi
        .volume_handle
        .find(VOLUME_ID_PREFIX)
        .and_then(|start| csi.volume_handle.get(start..))
        .unwrap_or_default()
        .to_owned())
}

/// Replaces the CSI volume handle and returns the re-encoded document.
///
/// # Errors
///
/// Returns [`PersistentVolumeError::MissingCsi`] when the document has no CSI
/// section, [`PersistentVolumeError::UnsupportedCsiDriver`] when another
/// driver provisioned the volume, and [`PersistentVolumeError::Document`]
/// when decoding or encoding fails.
pub fn set_volume_id(document: &Value, volume_id: &str) -> Result<Value, PersistentVolumeError> {
    let mut volume = from_document(document)?;
    let csi = volume
        .spec
        .as_mut()
        .and_then(|spec| spec.csi.as_mut())
        .ok_or(PersistentVolumeError::MissingCsi)?;
    if csi.driver != SBS_CSI_DRIVER {
        return Err(PersistentVolumeError::UnsupportedCsiDriver {
            driver: csi.driver.clone(),
        });
    }

    volume_id.clone_into(&mut csi.volume_handle);
    to_document(&volume)
}
