//! `galasactl runs submit local` - run a test in a JVM on this machine
//! and report its result.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::Args;
use jvm_launcher::env::{Environment, OsEnvironment};
use jvm_launcher::overrides::Overrides;
use jvm_launcher::{JvmLauncher, SubmitRunRequest, TestRun};
use tracing::debug;

use super::launch_context::{build_launch_environment, SharedLaunchArgs};

/// How often submitted runs are re-checked for completion. The launcher
/// interrupts the wait as soon as a JVM finishes.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Flags for `runs submit local`.
#[derive(Args)]
pub struct SubmitLocalArgs {
    /// The test to run, as <bundle>/<qualified.class.Name>
    #[arg(long = "class", required_unless_present = "gherkin")]
    pub class: Option<String>,

    /// A gherkin feature file URL to run instead of a java class
    #[arg(long)]
    pub gherkin: Option<String>,

    /// The run group to submit into. Generated when not given.
    #[arg(long)]
    pub group: Option<String>,

    /// Who to record as the requestor. Defaults to the current user.
    #[arg(long)]
    pub requestor: Option<String>,

    /// The test stream to record on the run
    #[arg(long)]
    pub stream: Option<String>,

    /// A property override for this run, as key=value. Repeatable.
    #[arg(long = "override", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    #[command(flatten)]
    pub launch: SharedLaunchArgs,
}

pub async fn run(args: SubmitLocalArgs) -> Result<()> {
    let (launch_env, authenticator) = build_launch_environment(&args.launch)?;

    let group = args
        .group
        .clone()
        .unwrap_or_else(|| format!("local-{}", chrono::Utc::now().timestamp_millis()));
    let requestor = args
        .requestor
        .clone()
        .or_else(|| OsEnvironment.get_env("USER"))
        .unwrap_or_else(|| "unknown".to_string());

    let launcher = JvmLauncher::new(launch_env, authenticator, &args.launch.obrs)?;

    let request = SubmitRunRequest {
        group_name: group.clone(),
        class_name: args.class.clone().unwrap_or_default(),
        request_type: "local".to_string(),
        requestor,
        stream: args.stream.clone(),
        portfolio_obr: None,
        gherkin_url: args.gherkin.clone(),
        overrides: parse_overrides(&args.overrides)?,
    };

    launcher.submit_test_run(request).await?;
    println!("Submitted run into group '{}'", group);

    let sleeper = launcher.sleeper();
    let finished = loop {
        let runs = launcher.runs_by_group(&group)?;
        if runs.complete {
            break runs;
        }
        debug!(group, "runs still in progress");
        sleeper.sleep(POLL_INTERVAL).await;
    };

    let mut failures = 0;
    for run in &finished.runs {
        if !report_run(&launcher, run)? {
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} test run(s) did not pass", failures);
    }
    Ok(())
}

// Prints one run's outcome; true means it passed.
fn report_run(launcher: &JvmLauncher, run: &TestRun) -> Result<bool> {
    match launcher.run_by_id(&run.name) {
        Ok(Some(result)) => {
            let outcome = result
                .test_structure
                .result
                .unwrap_or_else(|| "Unknown".to_string());
            println!("Run {} - {}", run.name, outcome);
            Ok(outcome == "Passed")
        }
        Ok(None) => {
            println!("Run {} - no status recorded", run.name);
            Ok(false)
        }
        Err(error) => {
            println!("Run {} - status could not be read: {}", run.name, error);
            Ok(false)
        }
    }
}

fn parse_overrides(raw: &[String]) -> Result<Overrides> {
    let mut overrides = Overrides::new();
    for entry in raw {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid override '{}': expected key=value", entry))?;
        overrides.insert(key.to_string(), value.to_string());
    }
    Ok(overrides)
}
