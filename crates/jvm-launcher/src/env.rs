//! An abstraction of the process environment, so launchers can look up
//! things like JAVA_HOME and tests can supply their own values.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// A capability for reading environment variables
pub trait Environment: Send + Sync {
    /// Look up an environment variable, None if unset
    fn get_env(&self, name: &str) -> Option<String>;
}

/// Environment reader backed by the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnvironment;

impl Environment for OsEnvironment {
    fn get_env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment, for tests and for callers that want to pin
/// values independently of the real process environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, builder-style
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl Environment for MapEnvironment {
    fn get_env(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Check that a JAVA_HOME value points at a usable Java runtime, which
/// means a `bin/java` program must exist beneath it.
pub fn validate_java_home(java_home: &str) -> Result<()> {
    if java_home.is_empty() {
        return Err(Error::JavaHomeNotSet);
    }
    let java_program = Path::new(java_home).join("bin").join("java");
    if !java_program.is_file() {
        return Err(Error::JavaHomeInvalid {
            path: java_home.to_string(),
        });
    }
    Ok(())
}
