//! Error types for local JVM launching

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the local JVM launchers
#[derive(Error, Debug)]
pub enum Error {
    /// No OBR was supplied, so there is no way of locating the test
    #[error(
        "no OBR specified; cannot locate test '{class}' without an --obr option or a portfolio OBR"
    )]
    NoObrSpecified {
        /// The test class the user asked for
        class: String,
    },

    /// An OBR string did not carry the mvn: scheme prefix
    #[error("badly formed OBR '{obr}': expected the 'mvn:' scheme prefix")]
    ObrMissingMvnPrefix {
        /// The offending OBR string
        obr: String,
    },

    /// An OBR string did not have exactly four slash-separated parts
    #[error("badly formed OBR '{obr}': expected the form 'mvn:<group>/<artifact>/<version>/obr'")]
    ObrWrongPartCount {
        /// The offending OBR string
        obr: String,
    },

    /// An OBR string did not end in the literal 'obr' segment
    #[error("badly formed OBR '{obr}': expected the trailing segment to be 'obr'")]
    ObrBadSuffix {
        /// The offending OBR string
        obr: String,
    },

    /// A test class name had no slash between bundle and class
    #[error("invalid test class '{class}': expected the form '<bundle>/<qualified-class-name>'")]
    ClassNameMissingSlash {
        /// The offending class input
        class: String,
    },

    /// A test class name had more than one slash
    #[error("invalid test class '{class}': too many slashes, expected exactly one")]
    ClassNameTooManySlashes {
        /// The offending class input
        class: String,
    },

    /// A test class name carried a redundant .class suffix
    #[error("invalid test class '{class}': the '.class' suffix is not needed")]
    ClassNameHasClassSuffix {
        /// The offending class input
        class: String,
    },

    /// A gherkin URL did not start with file://
    #[error("invalid gherkin URL '{url}': expected a 'file://' prefix")]
    GherkinUrlBadPrefix {
        /// The offending URL
        url: String,
    },

    /// A gherkin URL did not end in .feature
    #[error("invalid gherkin URL '{url}': expected a '.feature' suffix")]
    GherkinUrlBadSuffix {
        /// The offending URL
        url: String,
    },

    /// The bootstrap debug port property held something other than an unsigned number
    #[error("invalid debug port value '{value}' in bootstrap property '{property}'")]
    BadDebugPortFromBootstrap {
        /// The offending property value
        value: String,
        /// The bootstrap property the value came from
        property: String,
    },

    /// The bootstrap debug mode property held an unrecognised mode
    #[error(
        "invalid debug mode '{value}' in bootstrap property '{property}': \
         expected 'listen' or 'attach'"
    )]
    BadDebugModeFromBootstrap {
        /// The offending property value
        value: String,
        /// The bootstrap property the value came from
        property: String,
    },

    /// The --debug-mode flag held an unrecognised mode
    #[error("invalid debug mode '{value}': expected 'listen' or 'attach'")]
    BadDebugModeFromCommandLine {
        /// The offending flag value
        value: String,
    },

    /// JAVA_HOME is not set in the environment
    #[error("JAVA_HOME is not set; it must point at a Java runtime installation")]
    JavaHomeNotSet,

    /// JAVA_HOME does not point at a usable Java runtime
    #[error("JAVA_HOME '{path}' is invalid: no 'bin/java' found beneath it")]
    JavaHomeInvalid {
        /// The JAVA_HOME path that failed validation
        path: String,
    },

    /// The boot jar could not be located beneath the home folder
    #[error("no boot jar found in '{dir}': expected a 'galasa-boot-*.jar'")]
    BootJarNotFound {
        /// The lib directory that was searched
        dir: PathBuf,
    },

    /// The user home directory could not be resolved
    #[error("unable to resolve the user home directory to default the local maven repository")]
    UserHomeNotFound,

    /// The home folder skeleton could not be created
    #[error("failed to initialise home folder '{path}': {source}")]
    HomeSetup {
        /// The home folder being initialised
        path: PathBuf,
        /// The underlying I/O failure
        source: std::io::Error,
    },

    /// The temporary overrides folder or file could not be created
    #[error("failed to prepare temporary overrides file: {0}")]
    TempFiles(#[source] std::io::Error),

    /// The status artifact does not exist
    #[error("status file '{path}' does not exist")]
    StatusFileMissing {
        /// The expected status file path
        path: PathBuf,
    },

    /// The status artifact could not be read
    #[error("status file '{path}' could not be read: {source}")]
    StatusFileUnreadable {
        /// The status file path
        path: PathBuf,
        /// The underlying I/O failure
        source: std::io::Error,
    },

    /// The status artifact was empty
    #[error("status file '{path}' is empty, run status could not be read")]
    StatusFileEmpty {
        /// The status file path
        path: PathBuf,
    },

    /// The status artifact held something other than a test structure
    #[error("status file '{path}' could not be parsed: {source}")]
    StatusFileInvalid {
        /// The status file path
        path: PathBuf,
        /// The underlying parse failure
        source: serde_json::Error,
    },

    /// A bearer token could not be obtained from the authenticator
    #[error("failed to obtain a bearer token: {reason}")]
    AuthenticationFailed {
        /// Why the token negotiation failed
        reason: String,
    },

    /// The external process could not be started
    #[error(transparent)]
    ProcessStart(#[from] process_executor::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
