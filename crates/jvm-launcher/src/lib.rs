//! Launches Galasa test runs and resource cleanup in a local JVM.
//!
//! The launcher builds a `java` command line from the user's home
//! folder layout, bootstrap properties, and OBR coordinates, then
//! starts the JVM through an injected [`process_executor::Spawner`] and
//! tracks it to completion. Submissions return immediately and are
//! polled by run group; resource cleanup blocks until the JVM exits.

#![warn(missing_docs)]

pub mod auth;
pub mod boot_process;
pub mod bootstrap;
pub mod cleanup;
pub mod coordinates;
pub mod debug;
pub mod env;
pub mod error;
pub mod home;
pub mod monitor;
pub mod overrides;
pub mod runs;
pub mod sleeper;
pub mod status;
pub mod submit;
pub mod syntax;

pub use auth::{Authenticator, EnvTokenAuthenticator};
pub use boot_process::LocalBootProcess;
pub use cleanup::ResourceCleanupLauncher;
pub use coordinates::{MavenCoordinates, TestLocation};
pub use env::{Environment, MapEnvironment, OsEnvironment};
pub use error::{Error, Result};
pub use home::GalasaHome;
pub use runs::{Run, TestRun, TestRuns};
pub use sleeper::TimedSleeper;
pub use status::TestStructure;
pub use submit::{JvmLauncher, LaunchEnvironment, SubmitRunRequest};
