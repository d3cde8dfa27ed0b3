//! Shared setup for the local-launch subcommands: common flags, and the
//! construction of a launch environment from the real surroundings.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use jvm_launcher::env::{validate_java_home, Environment, OsEnvironment};
use jvm_launcher::submit::LaunchEnvironment;
use jvm_launcher::{EnvTokenAuthenticator, GalasaHome};
use process_executor::LocalSpawner;

/// The default remote repository holding released test material.
const DEFAULT_REMOTE_MAVEN: &str = "https://development.galasa.dev/main/maven-repo/obr";

/// Flags shared by every subcommand that launches a local JVM.
#[derive(Args)]
pub struct SharedLaunchArgs {
    /// OBR coordinates locating loadable test code, as
    /// mvn:<group>/<artifact>/<version>/obr. Repeatable.
    #[arg(long = "obr")]
    pub obrs: Vec<String>,

    /// Remote maven repository to fetch test material from. Repeatable.
    #[arg(long = "remote-maven", default_value = DEFAULT_REMOTE_MAVEN)]
    pub remote_maven: Vec<String>,

    /// Local maven repository URL. Defaults to ~/.m2/repository.
    #[arg(long = "local-maven")]
    pub local_maven: Option<String>,

    /// The Galasa platform version to run tests against
    #[arg(long = "galasa-version", default_value = "0.43.0")]
    pub galasa_version: String,

    /// Launch the JVM under a java debugger agent
    #[arg(long)]
    pub debug: bool,

    /// Port for the java debugger agent. Defaults from the bootstrap,
    /// then 2970.
    #[arg(long = "debug-port", default_value_t = 0)]
    pub debug_port: u32,

    /// Whether the JVM listens for a debugger or attaches to one
    #[arg(long = "debug-mode", value_parser = ["listen", "attach"])]
    pub debug_mode: Option<String>,

    /// Turn on framework trace output in the launched JVM
    #[arg(long)]
    pub trace: bool,
}

/// Build a launch environment from the OS environment, creating the
/// home folder skeleton if it is not there yet.
pub fn build_launch_environment(
    args: &SharedLaunchArgs,
) -> Result<(LaunchEnvironment, Arc<EnvTokenAuthenticator>)> {
    let env = OsEnvironment;

    let java_home = env.get_env("JAVA_HOME").unwrap_or_default();
    validate_java_home(&java_home)?;

    let home = GalasaHome::locate(&env)?;
    home.initialise()
        .with_context(|| "failed to prepare the Galasa home folder")?;
    let bootstrap_props = home.load_bootstrap_properties()?;

    let launch_env = LaunchEnvironment {
        spawner: Arc::new(LocalSpawner),
        home,
        bootstrap_props,
        java_home,
        separator: std::path::MAIN_SEPARATOR,
        user_home: dirs::home_dir(),
        galasa_version: args.galasa_version.clone(),
        remote_maven_repos: args.remote_maven.clone(),
        local_maven: args.local_maven.clone(),
        is_trace_enabled: args.trace,
        is_debug_enabled: args.debug,
        debug_port: args.debug_port,
        debug_mode: args.debug_mode.clone(),
    };

    let authenticator = Arc::new(EnvTokenAuthenticator::new(Arc::new(env)));
    Ok((launch_env, authenticator))
}
