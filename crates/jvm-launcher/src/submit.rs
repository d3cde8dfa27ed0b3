//! Submits test runs to a local JVM and tracks them to completion.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use process_executor::{Command, Spawner};
use tracing::{debug, info};

use crate::auth::{jwt_for_launch, Authenticator};
use crate::boot_process::LocalBootProcess;
use crate::bootstrap::BootstrapProperties;
use crate::coordinates::{
    class_name_to_test_location, validate_gherkin_url, validate_obr, validate_obrs,
    MavenCoordinates, TestLocation,
};
use crate::error::{Error, Result};
use crate::home::GalasaHome;
use crate::overrides::{write_overrides_file, Overrides};
use crate::runs::{Run, TestRun, TestRuns};
use crate::sleeper::TimedSleeper;
use crate::status::read_test_structure;
use crate::syntax::{test_run_command, BaseCommandInputs};

/// Everything a local launch needs from its surroundings. Both the
/// test-run and resource-cleanup launchers are built over one of these.
pub struct LaunchEnvironment {
    /// Starts external processes
    pub spawner: Arc<dyn Spawner>,
    /// The home folder layout
    pub home: GalasaHome,
    /// The loaded bootstrap properties
    pub bootstrap_props: BootstrapProperties,
    /// Fully-qualified JAVA_HOME, already validated
    pub java_home: String,
    /// Platform-native file path separator
    pub separator: char,
    /// The user's home directory, for defaulting the local maven repository
    pub user_home: Option<PathBuf>,
    /// The platform version to run
    pub galasa_version: String,
    /// Remote maven repositories, in order
    pub remote_maven_repos: Vec<String>,
    /// Local maven repository URL override
    pub local_maven: Option<String>,
    /// Whether launched JVMs emit framework trace output
    pub is_trace_enabled: bool,
    /// Whether launched JVMs carry a java debug agent
    pub is_debug_enabled: bool,
    /// Debug port from the command line; 0 means unset
    pub debug_port: u32,
    /// Debug mode from the command line
    pub debug_mode: Option<String>,
}

impl LaunchEnvironment {
    pub(crate) fn base_inputs<'a>(
        &'a self,
        obrs: &'a [MavenCoordinates],
        jwt: Option<&'a str>,
    ) -> BaseCommandInputs<'a> {
        BaseCommandInputs {
            bootstrap_props: &self.bootstrap_props,
            home: &self.home,
            java_home: &self.java_home,
            separator: self.separator,
            user_home: self.user_home.as_deref(),
            obrs,
            remote_maven_repos: &self.remote_maven_repos,
            local_maven: self.local_maven.as_deref(),
            galasa_version: &self.galasa_version,
            is_trace_enabled: self.is_trace_enabled,
            is_debug_enabled: self.is_debug_enabled,
            debug_port: self.debug_port,
            debug_mode: self.debug_mode.as_deref(),
            jwt,
        }
    }
}

/// One request to run a test in a local JVM.
pub struct SubmitRunRequest {
    /// The run group the submission belongs to
    pub group_name: String,
    /// The test to run, as `bundle/qualified.class.Name`; ignored for
    /// gherkin runs
    pub class_name: String,
    /// The request type recorded on the run, for example "local"
    pub request_type: String,
    /// Who is asking
    pub requestor: String,
    /// The test stream, when one was named
    pub stream: Option<String>,
    /// An extra OBR contributed by a portfolio, merged with the
    /// configured list
    pub portfolio_obr: Option<String>,
    /// A gherkin feature to run instead of a java test class
    pub gherkin_url: Option<String>,
    /// Property overrides for this run
    pub overrides: Overrides,
}

struct TrackedRun {
    record: TestRun,
    process: LocalBootProcess,
}

/// Launches tests in local JVMs and answers status queries about them.
///
/// Trackers live for the life of the launcher so that callers can keep
/// polling by group or by run name after submission returns.
pub struct JvmLauncher {
    env: LaunchEnvironment,
    authenticator: Arc<dyn Authenticator>,
    obrs: Vec<MavenCoordinates>,
    sleeper: Arc<TimedSleeper>,
    tracked: Mutex<Vec<TrackedRun>>,
    next_run_number: AtomicU32,
}

impl std::fmt::Debug for JvmLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JvmLauncher").finish_non_exhaustive()
    }
}

impl JvmLauncher {
    /// Create a launcher over the given environment and OBR list.
    ///
    /// The OBR strings are validated up front so a typo fails fast
    /// rather than at first submission.
    pub fn new(
        env: LaunchEnvironment,
        authenticator: Arc<dyn Authenticator>,
        obrs: &[String],
    ) -> Result<Self> {
        let obrs = validate_obrs(obrs)?;
        Ok(Self {
            env,
            authenticator,
            obrs,
            sleeper: Arc::new(TimedSleeper::new()),
            tracked: Mutex::new(Vec::new()),
            next_run_number: AtomicU32::new(1),
        })
    }

    /// The sleeper interrupted whenever one of this launcher's JVMs
    /// finishes. Pollers can sleep on it between status checks.
    pub fn sleeper(&self) -> Arc<TimedSleeper> {
        self.sleeper.clone()
    }

    /// Launch a test in a local JVM.
    ///
    /// Returns immediately after the process starts; callers poll
    /// [`JvmLauncher::runs_by_group`] for completion.
    pub async fn submit_test_run(&self, request: SubmitRunRequest) -> Result<TestRuns> {
        let obrs = self.obrs_for_submission(&request)?;

        let test_location = match &request.gherkin_url {
            Some(url) => {
                validate_gherkin_url(url)?;
                // Gherkin runs have no bundle or class.
                TestLocation {
                    bundle_name: String::new(),
                    class_name: String::new(),
                }
            }
            None => class_name_to_test_location(&request.class_name)?,
        };

        let jwt = jwt_for_launch(&self.env.bootstrap_props, self.authenticator.as_ref()).await?;

        // The overrides file only needs to outlive the launch itself;
        // the JVM reads it at startup.
        let overrides_file = write_overrides_file(&request.overrides, &self.env.home)?;

        let inputs = self.env.base_inputs(&obrs, jwt.as_deref());
        let (cmd, args) = test_run_command(
            &inputs,
            overrides_file.path(),
            request.gherkin_url.as_deref(),
            &test_location,
        )?;

        info!(cmd, "launching local jvm");
        debug!(?args, "local jvm arguments");

        let mut command = Command::new(&cmd);
        command.args(&args);
        let (events, handle) = self.env.spawner.spawn(command).await?;
        let process = LocalBootProcess::start(events, handle, self.sleeper.clone());

        let record = TestRun {
            name: self.generate_run_name(),
            bundle_name: (!test_location.bundle_name.is_empty())
                .then(|| test_location.bundle_name.clone()),
            stream: request.stream.clone(),
            group: request.group_name.clone(),
            requestor: request.requestor.clone(),
            trace: self.env.is_trace_enabled,
            request_type: request.request_type.clone(),
            submission_id: String::new(),
        };

        let mut tracked = self.tracked.lock().unwrap();
        tracked.push(TrackedRun { record, process });

        Ok(self.runs_snapshot(&request.group_name, &tracked))
    }

    /// All tracked runs in a group, with an aggregate completion flag.
    ///
    /// Run names are refreshed from the JVM output on every call, so a
    /// placeholder name becomes the framework-allocated one as soon as
    /// it appears.
    pub fn runs_by_group(&self, group_name: &str) -> Result<TestRuns> {
        let mut tracked = self.tracked.lock().unwrap();
        for entry in tracked.iter_mut() {
            if let Some(run_id) = entry.process.run_id() {
                entry.record.name = run_id;
            }
        }
        Ok(self.runs_snapshot(group_name, &tracked))
    }

    /// A single tracked run with its status re-read from the result
    /// archive store.
    pub fn run_by_id(&self, run_id: &str) -> Result<Option<Run>> {
        let tracked = self.tracked.lock().unwrap();
        let entry = tracked.iter().find(|entry| {
            entry.process.run_id().as_deref() == Some(run_id) || entry.record.name == run_id
        });

        match entry {
            Some(entry) => {
                let ras_url = entry
                    .process
                    .ras_folder_url()
                    .unwrap_or_else(|| self.env.home.ras_folder_url());
                let run_folder = url_to_native_path(&ras_url).join(run_id);
                let structure = read_test_structure(&run_folder)?;
                Ok(Some(Run {
                    name: run_id.to_string(),
                    test_structure: structure,
                }))
            }
            None => Ok(None),
        }
    }

    /// Local launches have no server-side streams.
    pub fn streams(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Local launches have no server-side test catalog.
    pub fn test_catalog(&self, _stream: &str) -> Result<Option<serde_json::Value>> {
        Ok(None)
    }

    fn obrs_for_submission(&self, request: &SubmitRunRequest) -> Result<Vec<MavenCoordinates>> {
        let mut obrs = self.obrs.clone();
        if let Some(portfolio_obr) = &request.portfolio_obr {
            obrs.push(validate_obr(portfolio_obr)?);
        }
        // A gherkin feature carries its own code, so no OBR is needed.
        if obrs.is_empty() && request.gherkin_url.is_none() {
            return Err(Error::NoObrSpecified {
                class: request.class_name.clone(),
            });
        }
        Ok(obrs)
    }

    fn generate_run_name(&self) -> String {
        let number = self.next_run_number.fetch_add(1, Ordering::Relaxed);
        format!("LOCAL-{}", number)
    }

    fn runs_snapshot(&self, group_name: &str, tracked: &[TrackedRun]) -> TestRuns {
        let members: Vec<&TrackedRun> = tracked
            .iter()
            .filter(|entry| entry.record.group == group_name)
            .collect();
        TestRuns {
            complete: members.iter().all(|entry| entry.process.is_completed()),
            runs: members.iter().map(|entry| entry.record.clone()).collect(),
        }
    }
}

/// Turn a `file://` URL back into a native filesystem path.
fn url_to_native_path(url: &str) -> PathBuf {
    let stripped = url.strip_prefix("file://").unwrap_or(url);
    // Windows drive URLs look like file:///C:/..., where the leading
    // slash is part of the URL, not the path.
    let bytes = stripped.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'/' && bytes[2] == b':' {
        PathBuf::from(&stripped[1..])
    } else {
        PathBuf::from(stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_ras_url_maps_to_native_path() {
        assert_eq!(
            url_to_native_path("file:///home/me/.galasa/ras"),
            PathBuf::from("/home/me/.galasa/ras")
        );
    }

    #[test]
    fn windows_ras_url_drops_the_leading_slash() {
        assert_eq!(
            url_to_native_path("file:///C:/Users/me/.galasa/ras"),
            PathBuf::from("C:/Users/me/.galasa/ras")
        );
    }

    #[test]
    fn plain_path_passes_through() {
        assert_eq!(
            url_to_native_path("/tmp/ras"),
            PathBuf::from("/tmp/ras")
        );
    }
}
