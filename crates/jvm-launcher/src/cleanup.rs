//! Runs local resource cleanup in a JVM and blocks until it finishes.

use std::sync::Arc;
use std::time::Duration;

use process_executor::Command;
use tracing::{debug, info};

use crate::auth::{jwt_for_launch, Authenticator};
use crate::boot_process::LocalBootProcess;
use crate::coordinates::validate_obrs;
use crate::error::Result;
use crate::sleeper::TimedSleeper;
use crate::submit::LaunchEnvironment;
use crate::syntax::resource_cleanup_command;

/// How long to wait between completion checks. The sleeper's interrupt
/// cuts the wait short when the JVM finishes mid-interval.
const COMPLETION_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Launches the resource-management framework in a local JVM and waits
/// for it to finish.
pub struct ResourceCleanupLauncher {
    env: LaunchEnvironment,
    authenticator: Arc<dyn Authenticator>,
    obrs: Vec<String>,
    includes_patterns: Vec<String>,
    excludes_patterns: Vec<String>,
}

impl ResourceCleanupLauncher {
    /// Create a cleanup launcher. OBR validation is deferred to
    /// [`ResourceCleanupLauncher::run_resource_cleanup`] so a single
    /// error path reports all launch failures.
    pub fn new(
        env: LaunchEnvironment,
        authenticator: Arc<dyn Authenticator>,
        obrs: Vec<String>,
        includes_patterns: Vec<String>,
        excludes_patterns: Vec<String>,
    ) -> Self {
        Self {
            env,
            authenticator,
            obrs,
            includes_patterns,
            excludes_patterns,
        }
    }

    /// Launch resource cleanup and block until the JVM exits.
    ///
    /// Launch failures are returned; a cleanup JVM which starts but
    /// then finishes badly is logged by the process tracker and not
    /// surfaced here.
    pub async fn run_resource_cleanup(&self) -> Result<()> {
        let obrs = validate_obrs(&self.obrs)?;

        let jwt = jwt_for_launch(&self.env.bootstrap_props, self.authenticator.as_ref()).await?;

        let inputs = self.env.base_inputs(&obrs, jwt.as_deref());
        let (cmd, args) = resource_cleanup_command(
            &inputs,
            &self.includes_patterns,
            &self.excludes_patterns,
        )?;

        info!(cmd, "launching local resource cleanup jvm");
        debug!(?args, "resource cleanup jvm arguments");

        let mut command = Command::new(&cmd);
        command.args(&args);
        let (events, handle) = self.env.spawner.spawn(command).await?;

        let sleeper = Arc::new(TimedSleeper::new());
        let process = LocalBootProcess::start(events, handle, sleeper.clone());

        // Check first so a JVM which finishes instantly is noticed
        // without sleeping at all.
        while !process.is_completed() {
            sleeper.sleep(COMPLETION_POLL_INTERVAL).await;
        }

        info!("local resource cleanup finished");
        Ok(())
    }
}
