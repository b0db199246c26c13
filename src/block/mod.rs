//! Scaleway Block Storage API access.
//!
//! [`BlockStorageApi`] is the seam between the snapshotter and the network:
//! [`HttpBlockApi`] talks to the real API, tests substitute a scripted double.

mod error;
mod http;
mod types;

use std::future::Future;
use std::pin::Pin;

pub use error::BlockApiError;
pub use http::{HttpBlockApi, SCALEWAY_BLOCK_API_BASE};
pub use types::{
    CreateSnapshotRequest, CreateVolumeRequest, FromSnapshot, Snapshot, SnapshotParentVolume,
    Volume, VolumeSpecs,
};

/// Future returned by Block Storage API operations.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BlockApiError>> + Send + 'a>>;

/// Zone-scoped Block Storage operations used by the snapshotter.
///
/// Each call maps to exactly one API request; implementations never retry.
pub trait BlockStorageApi {
    /// Fetches a snapshot.
    fn get_snapshot<'a>(&'a self, zone: &'a str, snapshot_id: &'a str) -> ApiFuture<'a, Snapshot>;

    /// Creates a volume from a snapshot.
    fn create_volume<'a>(&'a self, request: &'a CreateVolumeRequest) -> ApiFuture<'a, Volume>;

    /// Fetches a volume.
    fn get_volume<'a>(&'a self, zone: &'a str, volume_id: &'a str) -> ApiFuture<'a, Volume>;

    /// Creates a snapshot of a volume.
    fn create_snapshot<'a>(&'a self, request: &'a CreateSnapshotRequest)
    -> ApiFuture<'a, Snapshot>;

    /// Deletes a snapshot.
    fn delete_snapshot<'a>(&'a self, zone: &'a str, snapshot_id: &'a str) -> ApiFuture<'a, ()>;
}
