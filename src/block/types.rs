//! Wire types for the Scaleway Block Storage API (`block/v1alpha1`).

use serde::{Deserialize, Serialize};

/// Block Storage volume as returned by `GET /volumes/{id}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Volume {
    /// Volume identifier.
    pub id: String,
    /// Volume name.
    pub name: String,
    /// Zone hosting the volume.
    pub zone: String,
    /// Tags attached to the volume.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Volume type (for example `sbs_5k`).
    #[serde(rename = "type", default)]
    pub volume_type: String,
    /// Performance specification, absent for some volume classes.
    #[serde(default)]
    pub specs: Option<VolumeSpecs>,
}

/// Performance characteristics of a volume.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct VolumeSpecs {
    /// Provisioned IOPS.
    #[serde(default)]
    pub perf_iops: Option<u32>,
    /// Storage class.
    #[serde(default)]
    pub class: Option<String>,
}

/// Reference to the volume a snapshot was taken from.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct SnapshotParentVolume {
    /// Volume identifier.
    pub id: String,
}

/// Block Storage snapshot as returned by `GET /snapshots/{id}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Snapshot {
    /// Snapshot identifier.
    pub id: String,
    /// Snapshot name.
    pub name: String,
    /// Zone hosting the snapshot.
    pub zone: String,
    /// Tags attached to the snapshot.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Volume the snapshot was taken from, when it still exists.
    #[serde(default)]
    pub parent_volume: Option<SnapshotParentVolume>,
}

/// Source snapshot of a volume creation request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FromSnapshot {
    /// Snapshot to restore.
    pub snapshot_id: String,
}

/// Body of `POST /volumes`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CreateVolumeRequest {
    /// Zone hosting the new volume; part of the URL, not the body.
    #[serde(skip)]
    pub zone: String,
    /// Volume name.
    pub name: String,
    /// Project owning the volume.
    pub project_id: String,
    /// Snapshot to restore from.
    pub from_snapshot: FromSnapshot,
    /// Requested IOPS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perf_iops: Option<u32>,
    /// Tags for the new volume.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Body of `POST /snapshots`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CreateSnapshotRequest {
    /// Zone hosting the source volume; part of the URL, not the body.
    #[serde(skip)]
    pub zone: String,
    /// Volume to snapshot.
    pub volume_id: String,
    /// Snapshot name.
    pub name: String,
    /// Project owning the snapshot.
    pub project_id: String,
    /// Tags for the new snapshot.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}
