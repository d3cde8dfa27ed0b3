//! Builds the java command line which launches a test run or resource
//! cleanup in a local JVM.
//!
//! The aim is an incantation like:
//!
//! ```text
//! java -jar ${BOOT_JAR_PATH} \
//!     --localmaven file:///${HOME}/.m2/repository \
//!     --remotemaven ${REMOTE_MAVEN} \
//!     --bootstrap file:///${HOME}/.galasa/bootstrap.properties \
//!     --obr mvn:${GROUP}/${ARTIFACT}/${VERSION}/obr \
//!     --obr mvn:dev.galasa/dev.galasa.uber.obr/${VERSION}/obr \
//!     --test ${BUNDLE}/${CLASS}
//! ```
//!
//! Argument order is significant: `-D` system properties only take
//! effect when they appear before `-jar`, and everything after
//! `-jar <path>` is handed to the launched program.

use std::path::Path;

use crate::bootstrap::{BootstrapProperties, PROPERTY_JVM_LAUNCH_OPTIONS};
use crate::coordinates::{MavenCoordinates, TestLocation};
use crate::debug::{resolve_debug_mode, resolve_debug_port, DebugMode};
use crate::error::{Error, Result};
use crate::home::GalasaHome;

/// Quote delimiter recognised in the bootstrap JVM launch options
const LAUNCH_OPTIONS_QUOTE: char = '"';
/// Token separator recognised in the bootstrap JVM launch options
const LAUNCH_OPTIONS_SEPARATOR: char = ' ';
/// Escape character recognised inside quoted launch-option runs
const LAUNCH_OPTIONS_ESCAPE: char = '\\';

/// The group/artifact of the platform's own umbrella OBR
const UBER_OBR_PREFIX: &str = "mvn:dev.galasa/dev.galasa.uber.obr/";

/// Everything the base command-line synthesis needs. Shared between the
/// test-run and resource-cleanup variants.
pub struct BaseCommandInputs<'a> {
    /// Bootstrap properties which may influence the launch
    pub bootstrap_props: &'a BootstrapProperties,
    /// The home folder layout
    pub home: &'a GalasaHome,
    /// Fully-qualified JAVA_HOME path
    pub java_home: &'a str,
    /// File path separator to compose the java executable path with
    pub separator: char,
    /// The user's home directory, used to default the local maven repository
    pub user_home: Option<&'a Path>,
    /// OBR coordinates naming where loadable code can be found
    pub obrs: &'a [MavenCoordinates],
    /// Remote maven repositories, in order
    pub remote_maven_repos: &'a [String],
    /// Local maven repository URL; defaulted beneath the user home when unset
    pub local_maven: Option<&'a str>,
    /// The platform version to run, picking the umbrella OBR
    pub galasa_version: &'a str,
    /// Whether --trace is passed to the launched JVM
    pub is_trace_enabled: bool,
    /// Whether the JVM is launched under a java debugger agent
    pub is_debug_enabled: bool,
    /// Debug port from the command line; 0 means unset
    pub debug_port: u32,
    /// Debug mode from the command line; None means unset
    pub debug_mode: Option<&'a str>,
    /// Bearer token to pass through to the JVM, when one was negotiated
    pub jwt: Option<&'a str>,
}

/// Build the command line for submitting a test to run in a local JVM.
///
/// On top of the base syntax this appends the overrides file and either
/// the gherkin URL or the `bundle/class` test location.
pub fn test_run_command(
    inputs: &BaseCommandInputs<'_>,
    overrides_file_path: &Path,
    gherkin_url: Option<&str>,
    test_location: &TestLocation,
) -> Result<(String, Vec<String>)> {
    let (cmd, mut args) = base_command(inputs)?;

    // Turn the file path provided into a URL so slashes always go the same way.
    args.push("--overrides".to_string());
    let overrides_url = format!(
        "file:///{}",
        overrides_file_path.to_string_lossy().replace('\\', "/")
    );
    args.push(overrides_url);

    match gherkin_url {
        Some(url) => {
            args.push("--gherkin".to_string());
            args.push(url.to_string());
        }
        None => {
            args.push("--test".to_string());
            args.push(format!(
                "{}/{}",
                test_location.bundle_name, test_location.class_name
            ));
        }
    }

    Ok((cmd, args))
}

/// Build the command line for running resource cleanup in a local JVM.
///
/// On top of the base syntax this appends the resource-management flag
/// and the include/exclude monitor patterns, preserving input order.
pub fn resource_cleanup_command(
    inputs: &BaseCommandInputs<'_>,
    includes_patterns: &[String],
    excludes_patterns: &[String],
) -> Result<(String, Vec<String>)> {
    let (cmd, mut args) = base_command(inputs)?;

    args.push("--local-resource-management".to_string());

    for pattern in includes_patterns {
        args.push("--includes-monitor-pattern".to_string());
        args.push(pattern.clone());
    }

    for pattern in excludes_patterns {
        args.push("--excludes-monitor-pattern".to_string());
        args.push(pattern.clone());
    }

    Ok((cmd, args))
}

/// The part of the command line shared by test runs and resource cleanup.
fn base_command(inputs: &BaseCommandInputs<'_>) -> Result<(String, Vec<String>)> {
    let debug_mode = resolve_debug_mode(inputs.debug_mode, inputs.bootstrap_props)?;
    let debug_port = resolve_debug_port(inputs.debug_port, inputs.bootstrap_props)?;
    let boot_jar_path = inputs.home.boot_jar_path()?;

    // Note: Even on windows, where the java executable is called
    // 'java.exe', the '.exe' extension is not needed.
    let separator = inputs.separator;
    let cmd = format!(
        "{}{}bin{}java",
        inputs.java_home, separator, separator
    );

    let mut args: Vec<String> = Vec::new();

    if inputs.is_debug_enabled {
        args.push(debug_agent_arg(debug_mode, debug_port));
    }

    if let Some(options) = inputs.bootstrap_props.get(PROPERTY_JVM_LAUNCH_OPTIONS) {
        args.extend(parse_jvm_launch_options(options));
    }

    // Any -D properties are options for the JVM, so must appear before
    // the -jar parameter. Parameters after -jar get passed into the
    // main of the launched java program.
    args.push("-Dfile.encoding=UTF-8".to_string());
    args.push(format!(
        "-DGALASA_HOME=\"{}\"",
        inputs.home.native_folder_path().to_string_lossy()
    ));

    // If there is a bearer token, pass it through.
    if let Some(jwt) = inputs.jwt {
        args.push(format!("-DGALASA_JWT={}", jwt));
    }

    args.push("-jar".to_string());
    args.push(boot_jar_path.to_string_lossy().into_owned());

    // Note: URLs always have forward slashes.
    let local_maven = default_local_maven_if_not_set(inputs.local_maven, inputs.user_home)?;
    args.push("--localmaven".to_string());
    args.push(local_maven);

    for repo in inputs.remote_maven_repos {
        args.push("--remotemaven".to_string());
        args.push(repo.clone());
    }

    args.push("--bootstrap".to_string());
    args.push(inputs.home.bootstrap_properties_url());

    for obr in inputs.obrs {
        args.push("--obr".to_string());
        args.push(format!(
            "mvn:{}/{}/{}/obr",
            obr.group_id, obr.artifact_id, obr.version
        ));
    }

    // The platform's own umbrella OBR, at the requested version.
    args.push("--obr".to_string());
    args.push(format!("{}{}/obr", UBER_OBR_PREFIX, inputs.galasa_version));

    if inputs.is_trace_enabled {
        args.push("--trace".to_string());
    }

    Ok((cmd, args))
}

/// Compose the jdwp agent argument. `server=y` means the JVM listens on
/// the port; `server=n` means it attaches to a waiting debugger.
fn debug_agent_arg(mode: DebugMode, port: u32) -> String {
    let server_flag = match mode {
        DebugMode::Listen => 'y',
        DebugMode::Attach => 'n',
    };
    format!(
        "-agentlib:jdwp=transport=dt_socket,address=*:{},server={},suspend=y",
        port, server_flag
    )
}

fn default_local_maven_if_not_set(
    local_maven: Option<&str>,
    user_home: Option<&Path>,
) -> Result<String> {
    match local_maven.filter(|value| !value.is_empty()) {
        Some(value) => Ok(value.to_string()),
        None => {
            let user_home = user_home.ok_or(Error::UserHomeNotFound)?;
            Ok(format!(
                "file:///{}/.m2/repository",
                user_home.to_string_lossy().replace('\\', "/")
            ))
        }
    }
}

/// Split the bootstrap JVM launch options property into individual
/// arguments.
///
/// Tokens are separated by spaces. A quote-delimited run keeps its
/// spaces; inside a quoted run, an escape character immediately before
/// a quote inserts a literal quote without closing the run. An
/// unterminated quoted run is consumed to the end of the string.
pub fn parse_jvm_launch_options(options: &str) -> Vec<String> {
    let trimmed = options.trim();
    let chars: Vec<char> = trimmed.chars().collect();

    let mut args: Vec<String> = Vec::new();
    let mut arg = String::new();
    let mut in_quotes = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == LAUNCH_OPTIONS_QUOTE {
            // Start or end of a quoted run. Update state, discard the quote.
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if c == LAUNCH_OPTIONS_SEPARATOR {
                // An unquoted space marks the end of the argument.
                args.push(std::mem::take(&mut arg));
            } else {
                arg.push(c);
            }
        } else if c == LAUNCH_OPTIONS_ESCAPE && chars.get(i + 1) == Some(&LAUNCH_OPTIONS_QUOTE) {
            // An escaped quote: keep the quote, discard the escape.
            arg.push(LAUNCH_OPTIONS_QUOTE);
            i += 1;
        } else {
            arg.push(c);
        }
        i += 1;
    }

    if !arg.is_empty() {
        args.push(arg);
    }

    args
}
