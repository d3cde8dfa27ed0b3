//! `galasactl runs cleanup local` - run resource cleanup in a JVM on
//! this machine and wait for it to finish.

use anyhow::Result;
use clap::Args;
use jvm_launcher::ResourceCleanupLauncher;

use super::launch_context::{build_launch_environment, SharedLaunchArgs};

/// Flags for `runs cleanup local`.
#[derive(Args)]
pub struct CleanupLocalArgs {
    /// Only run resource monitors whose bundle matches this glob.
    /// Repeatable.
    #[arg(long)]
    pub includes: Vec<String>,

    /// Skip resource monitors whose bundle matches this glob.
    /// Repeatable.
    #[arg(long)]
    pub excludes: Vec<String>,

    #[command(flatten)]
    pub launch: SharedLaunchArgs,
}

pub async fn run(args: CleanupLocalArgs) -> Result<()> {
    let (launch_env, authenticator) = build_launch_environment(&args.launch)?;

    let launcher = ResourceCleanupLauncher::new(
        launch_env,
        authenticator,
        args.launch.obrs.clone(),
        args.includes.clone(),
        args.excludes.clone(),
    );

    println!("Starting local resource cleanup...");
    launcher.run_resource_cleanup().await?;
    println!("Resource cleanup finished");
    Ok(())
}
