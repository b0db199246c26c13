//! Binary entry point for the `velero-plugin-scaleway` operator CLI.

mod cli;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::process;

use camino::Utf8PathBuf;
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use velero_plugin_scaleway::snapshotter::{CONFIG_PATH_KEY, PROFILE_KEY, REGION_KEY};
use velero_plugin_scaleway::{
    ClientConfigError, ClientConfigResolver, EnvironmentError, EnvironmentSnapshot,
    ResolveRequest, SnapshotterError, VolumeSnapshotter,
};

use cli::{
    Cli, Command, CreateSnapshotCommand, DeleteSnapshotCommand, GlobalArgs, RestoreVolumeCommand,
    VolumeInfoCommand,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("environment error: {0}")]
    Environment(#[from] EnvironmentError),
    #[error("configuration error: {0}")]
    Config(#[from] ClientConfigError),
    #[error("{0}")]
    Snapshotter(#[from] SnapshotterError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli, &mut io::stdout()).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

async fn dispatch(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let Cli { global, command } = cli;
    match command {
        Command::CheckConfig => check_config(&global, out),
        Command::VolumeInfo(args) => volume_info(&global, &args, out).await,
        Command::CreateSnapshot(args) => create_snapshot(&global, &args, out).await,
        Command::DeleteSnapshot(args) => delete_snapshot(&global, &args, out).await,
        Command::RestoreVolume(args) => restore_volume(&global, &args, out).await,
    }
}

fn check_config(global: &GlobalArgs, out: &mut impl Write) -> Result<(), CliError> {
    let environment = EnvironmentSnapshot::capture()?;
    let request = ResolveRequest {
        config_path: global.config_path.as_deref().map(Utf8PathBuf::from),
        profile_name: global.profile.clone(),
        region: global.region.clone(),
    };
    let config = ClientConfigResolver::new(environment).resolve(&request)?;

    writeln!(out, "access_key: {}", config.access_key)?;
    writeln!(out, "organization_id: {}", config.organization_id)?;
    writeln!(out, "zone: {}", config.zone)?;
    writeln!(out, "region: {}", config.region)?;
    Ok(())
}

async fn volume_info(
    global: &GlobalArgs,
    args: &VolumeInfoCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let info = snapshotter(global)?
        .get_volume_info(&args.volume_id, &args.zone)
        .await?;

    writeln!(out, "type: {}", info.volume_type)?;
    match info.iops {
        Some(iops) => writeln!(out, "iops: {iops}")?,
        None => writeln!(out, "iops: unknown")?,
    }
    Ok(())
}

async fn create_snapshot(
    global: &GlobalArgs,
    args: &CreateSnapshotCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let snapshot_id = snapshotter(global)?
        .create_snapshot(&args.volume_id, &args.name, &args.tags)
        .await?;
    writeln!(out, "{snapshot_id}")?;
    Ok(())
}

async fn delete_snapshot(
    global: &GlobalArgs,
    args: &DeleteSnapshotCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    snapshotter(global)?
        .delete_snapshot(&args.snapshot_id)
        .await?;
    writeln!(out, "deleted {}", args.snapshot_id)?;
    Ok(())
}

async fn restore_volume(
    global: &GlobalArgs,
    args: &RestoreVolumeCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let volume_id = snapshotter(global)?
        .create_volume_from_snapshot(&args.snapshot_id, &args.zone, args.iops)
        .await?;
    writeln!(out, "{volume_id}")?;
    Ok(())
}

fn snapshotter(global: &GlobalArgs) -> Result<VolumeSnapshotter, CliError> {
    VolumeSnapshotter::from_plugin_config(&plugin_config(global)).map_err(CliError::from)
}

fn plugin_config(global: &GlobalArgs) -> BTreeMap<String, String> {
    [
        (REGION_KEY, global.region.as_ref()),
        (CONFIG_PATH_KEY, global.config_path.as_ref()),
        (PROFILE_KEY, global.profile.as_ref()),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|inner| (key.to_owned(), inner.clone())))
    .collect()
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
