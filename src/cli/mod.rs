//! Command-line interface definitions for the `velero-plugin-scaleway` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser, Subcommand};

/// Top-level CLI for the `velero-plugin-scaleway` binary.
#[derive(Debug, Parser)]
#[command(
    name = "velero-plugin-scaleway",
    version,
    about = "Inspect and drive Scaleway Block Storage snapshots the way the Velero plugin does",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Settings shared by every subcommand.
    #[command(flatten)]
    pub(crate) global: GlobalArgs,
    /// Operation to run.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Plugin settings, mirroring the keys of the Velero snapshot location.
#[derive(Debug, Args)]
pub(crate) struct GlobalArgs {
    /// Region the snapshotter operates in (plugin key `region`).
    #[arg(long, global = true, value_name = "REGION")]
    pub(crate) region: Option<String>,
    /// Scaleway config file (plugin key `configPath`).
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config_path: Option<String>,
    /// Profile selected from the config file (plugin key `profile`).
    #[arg(long, global = true, value_name = "NAME")]
    pub(crate) profile: Option<String>,
}

/// Subcommands of the binary.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Resolve and validate the Scaleway client configuration.
    #[command(name = "check-config")]
    CheckConfig,
    /// Show the type and IOPS of a volume.
    #[command(name = "volume-info")]
    VolumeInfo(VolumeInfoCommand),
    /// Snapshot a volume.
    #[command(name = "create-snapshot")]
    CreateSnapshot(CreateSnapshotCommand),
    /// Delete a snapshot; an absent snapshot counts as deleted.
    #[command(name = "delete-snapshot")]
    DeleteSnapshot(DeleteSnapshotCommand),
    /// Restore a new volume from a snapshot.
    #[command(name = "restore-volume")]
    RestoreVolume(RestoreVolumeCommand),
}

/// Arguments for `volume-info`.
#[derive(Debug, Args)]
pub(crate) struct VolumeInfoCommand {
    /// Volume identifier.
    pub(crate) volume_id: String,
    /// Zone hosting the volume; defaults to the configured zone.
    #[arg(long, value_name = "ZONE", default_value = "")]
    pub(crate) zone: String,
}

/// Arguments for `create-snapshot`.
#[derive(Debug, Args)]
pub(crate) struct CreateSnapshotCommand {
    /// Volume to snapshot.
    pub(crate) volume_id: String,
    /// Snapshot name suffix.
    pub(crate) name: String,
    /// Extra tag for the snapshot; repeat for several tags.
    #[arg(long = "tag", value_name = "TAG")]
    pub(crate) tags: Vec<String>,
}

/// Arguments for `delete-snapshot`.
#[derive(Debug, Args)]
pub(crate) struct DeleteSnapshotCommand {
    /// Snapshot identifier.
    pub(crate) snapshot_id: String,
}

/// Arguments for `restore-volume`.
#[derive(Debug, Args)]
pub(crate) struct RestoreVolumeCommand {
    /// Snapshot to restore.
    pub(crate) snapshot_id: String,
    /// Zone for the new volume; defaults to the configured zone.
    #[arg(long, value_name = "ZONE", default_value = "")]
    pub(crate) zone: String,
    /// IOPS to provision for the new volume.
    #[arg(long, value_name = "IOPS")]
    pub(crate) iops: Option<u32>,
}
