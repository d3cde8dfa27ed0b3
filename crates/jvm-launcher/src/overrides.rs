//! Writes the temporary overrides file handed to a launched JVM.
//!
//! The caller's overrides are merged with a couple of forced values
//! which make a local run behave locally: results go to the local
//! result archive store, and run names get the local prefix.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use tracing::debug;

use crate::error::{Error, Result};
use crate::home::GalasaHome;

/// Overrides sent into the JVM as a java properties file.
pub type Overrides = HashMap<String, String>;

const PROPERTY_RAS_STORE: &str = "framework.resultarchive.store";
const PROPERTY_LOCAL_RUN_PREFIX: &str = "framework.request.type.LOCAL.prefix";

/// Run names for local runs start with this unless overridden.
const LOCAL_RUN_PREFIX: &str = "L";

/// A written overrides file, deleted along with its folder on drop.
pub struct OverridesFile {
    // Held for its Drop, which removes the folder.
    _temp_dir: TempDir,
    path: PathBuf,
}

impl OverridesFile {
    /// Where the file was written.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

/// Write the overrides to a temporary properties file.
///
/// The forced values are only applied when the caller has not set them,
/// so a deliberate redirection of the result archive store survives.
pub fn write_overrides_file(overrides: &Overrides, home: &GalasaHome) -> Result<OverridesFile> {
    let mut merged = overrides.clone();

    merged
        .entry(PROPERTY_RAS_STORE.to_string())
        .or_insert_with(|| format!("file:///{}/ras", home.url_folder_path()));
    merged
        .entry(PROPERTY_LOCAL_RUN_PREFIX.to_string())
        .or_insert_with(|| LOCAL_RUN_PREFIX.to_string());

    let temp_dir = TempDir::new().map_err(Error::TempFiles)?;
    let path = temp_dir.path().join("overrides.properties");

    let mut content = String::new();
    let mut keys: Vec<&String> = merged.keys().collect();
    keys.sort();
    for key in keys {
        content.push_str(key);
        content.push('=');
        content.push_str(&merged[key]);
        content.push('\n');
    }

    fs::write(&path, content).map_err(Error::TempFiles)?;
    debug!(path = %path.display(), "wrote overrides file");

    Ok(OverridesFile {
        _temp_dir: temp_dir,
        path,
    })
}
