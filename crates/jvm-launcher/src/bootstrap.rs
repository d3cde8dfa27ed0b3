//! Bootstrap properties and the well-known keys the launcher consults

use std::collections::HashMap;

/// The bootstrap property naming the framework's configuration property store
pub const PROPERTY_CONFIG_STORE: &str = "framework.config.store";

/// The bootstrap property which can pick the debug port for local JVM launches
pub const PROPERTY_DEBUG_PORT: &str = "framework.jvm.local.launch.debug.port";

/// The bootstrap property which can pick the debug mode for local JVM launches
pub const PROPERTY_DEBUG_MODE: &str = "framework.jvm.local.launch.debug.mode";

/// The bootstrap property holding extra space-separated JVM launch options
pub const PROPERTY_JVM_LAUNCH_OPTIONS: &str = "framework.jvm.local.launch.options";

/// The URL scheme which marks the configuration store as remote
const REMOTE_CONFIG_STORE_SCHEME: &str = "galasacps";

/// A key-value configuration set fetched from the bootstrap file which
/// can influence local JVM launch behaviour.
pub type BootstrapProperties = HashMap<String, String>;

/// Parse java-properties text into a property map.
///
/// Comment lines start with `#` or `!`. Everything up to the first `=`
/// is the key; keys and values are trimmed. Lines without an `=` are
/// ignored.
pub fn parse_properties(text: &str) -> BootstrapProperties {
    let mut props = BootstrapProperties::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            props.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    props
}

/// Decide whether the configuration store used by tests is remote.
/// If it is, a valid bearer token will be needed for the launched JVM.
pub fn is_config_store_remote(props: &BootstrapProperties) -> bool {
    props
        .get(PROPERTY_CONFIG_STORE)
        .map(|value| value.starts_with(REMOTE_CONFIG_STORE_SCHEME))
        .unwrap_or(false)
}

/// Get the https URL of the remote configuration store.
///
/// The bootstrap carries a URL like `galasacps://myhost/api`; the
/// authenticator needs the `https://myhost/api` equivalent.
pub fn remote_config_store_url(props: &BootstrapProperties) -> Option<String> {
    props
        .get(PROPERTY_CONFIG_STORE)
        .filter(|value| value.starts_with(REMOTE_CONFIG_STORE_SCHEME))
        .map(|value| value.replacen(REMOTE_CONFIG_STORE_SCHEME, "https", 1))
}
