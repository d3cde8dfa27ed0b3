//! Debug port and mode resolution for launched JVMs

use crate::bootstrap::{BootstrapProperties, PROPERTY_DEBUG_MODE, PROPERTY_DEBUG_PORT};
use crate::error::{Error, Result};

/// The port used to talk to a java debugger when nothing picks another one
pub const DEBUG_PORT_DEFAULT: u32 = 2970;

/// Whether the launched JVM listens for a java debugger to attach, or
/// attaches to one which is already listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    /// The JVM listens on the debug port for the debugger to attach
    Listen,
    /// The JVM attaches to a debugger already listening on the port
    Attach,
}

/// Resolve the debug port: the explicit flag value if nonzero, else the
/// bootstrap property, else the fixed default.
pub fn resolve_debug_port(flag_port: u32, props: &BootstrapProperties) -> Result<u32> {
    if flag_port != 0 {
        return Ok(flag_port);
    }
    match props.get(PROPERTY_DEBUG_PORT) {
        Some(value) => value
            .parse::<u32>()
            .map_err(|_| Error::BadDebugPortFromBootstrap {
                value: value.clone(),
                property: PROPERTY_DEBUG_PORT.to_string(),
            }),
        None => Ok(DEBUG_PORT_DEFAULT),
    }
}

/// Resolve the debug mode: the explicit flag value if given, else the
/// bootstrap property, else `listen`. The two sources report distinct
/// errors when the value is unrecognised.
pub fn resolve_debug_mode(flag_mode: Option<&str>, props: &BootstrapProperties) -> Result<DebugMode> {
    if let Some(mode) = flag_mode.filter(|mode| !mode.is_empty()) {
        return parse_mode(mode).ok_or_else(|| Error::BadDebugModeFromCommandLine {
            value: mode.to_string(),
        });
    }
    match props.get(PROPERTY_DEBUG_MODE) {
        Some(value) => parse_mode(value).ok_or_else(|| Error::BadDebugModeFromBootstrap {
            value: value.clone(),
            property: PROPERTY_DEBUG_MODE.to_string(),
        }),
        None => Ok(DebugMode::Listen),
    }
}

fn parse_mode(mode: &str) -> Option<DebugMode> {
    match mode.to_lowercase().as_str() {
        "listen" => Some(DebugMode::Listen),
        "attach" => Some(DebugMode::Attach),
        _ => None,
    }
}
