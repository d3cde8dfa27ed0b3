//! The home folder layout the launched JVM and the launcher share

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bootstrap::{parse_properties, BootstrapProperties};
use crate::env::Environment;
use crate::error::{Error, Result};

/// Environment variable which relocates the home folder
pub const HOME_ENV_VAR: &str = "GALASA_HOME";

/// Folder name used when defaulting beneath the user home directory
const HOME_FOLDER_NAME: &str = ".galasa";

const BOOTSTRAP_TEMPLATE: &str = include_str!("../resources/bootstrap.properties");
const OVERRIDES_TEMPLATE: &str = include_str!("../resources/overrides.properties");

/// A location the launcher can call home.
///
/// Holds the bootstrap properties file, the `lib` folder with the boot
/// jar, and the `ras` result-archive folder local runs write into.
#[derive(Debug, Clone)]
pub struct GalasaHome {
    native_path: PathBuf,
}

impl GalasaHome {
    /// Locate the home folder: `GALASA_HOME` if set, else `~/.galasa`.
    pub fn locate(env: &dyn Environment) -> Result<Self> {
        let native_path = match env.get_env(HOME_ENV_VAR) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => dirs::home_dir()
                .ok_or(Error::UserHomeNotFound)?
                .join(HOME_FOLDER_NAME),
        };
        Ok(Self { native_path })
    }

    /// Use an explicit folder as home
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            native_path: path.into(),
        }
    }

    /// The home folder as a native path
    pub fn native_folder_path(&self) -> &Path {
        &self.native_path
    }

    /// The home folder path with forward slashes, ready to embed in a URL
    pub fn url_folder_path(&self) -> String {
        self.native_path.to_string_lossy().replace('\\', "/")
    }

    /// `file:///` URL of the bootstrap properties file
    pub fn bootstrap_properties_url(&self) -> String {
        format!("file:///{}/bootstrap.properties", self.url_folder_path())
    }

    /// Native path of the bootstrap properties file
    pub fn bootstrap_properties_path(&self) -> PathBuf {
        self.native_path.join("bootstrap.properties")
    }

    /// Native path of the result archive store folder
    pub fn ras_folder_path(&self) -> PathBuf {
        self.native_path.join("ras")
    }

    /// `file:///` URL of the result archive store folder
    pub fn ras_folder_url(&self) -> String {
        format!("file:///{}/ras", self.url_folder_path())
    }

    /// Find the boot jar beneath `lib`, a file named `galasa-boot-*.jar`.
    pub fn boot_jar_path(&self) -> Result<PathBuf> {
        let lib_dir = self.native_path.join("lib");
        let entries = fs::read_dir(&lib_dir).map_err(|_| Error::BootJarNotFound {
            dir: lib_dir.clone(),
        })?;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("galasa-boot-") && name.ends_with(".jar") {
                return Ok(entry.path());
            }
        }
        Err(Error::BootJarNotFound { dir: lib_dir })
    }

    /// Make sure the home folder skeleton exists: `lib`, `ras`, and the
    /// bootstrap/overrides property files (written from the embedded
    /// templates only when absent).
    pub fn initialise(&self) -> Result<()> {
        let setup = |source: std::io::Error| Error::HomeSetup {
            path: self.native_path.clone(),
            source,
        };

        fs::create_dir_all(self.native_path.join("lib")).map_err(setup)?;
        fs::create_dir_all(self.ras_folder_path()).map_err(setup)?;

        let bootstrap_file = self.bootstrap_properties_path();
        if !bootstrap_file.exists() {
            debug!(path = %bootstrap_file.display(), "writing default bootstrap properties");
            fs::write(&bootstrap_file, BOOTSTRAP_TEMPLATE).map_err(setup)?;
        }

        let overrides_file = self.native_path.join("overrides.properties");
        if !overrides_file.exists() {
            fs::write(&overrides_file, OVERRIDES_TEMPLATE).map_err(setup)?;
        }

        Ok(())
    }

    /// Read and parse the bootstrap properties file. A missing file
    /// yields an empty property set.
    pub fn load_bootstrap_properties(&self) -> Result<BootstrapProperties> {
        let path = self.bootstrap_properties_path();
        if !path.exists() {
            return Ok(BootstrapProperties::new());
        }
        let text = fs::read_to_string(&path)?;
        Ok(parse_properties(&text))
    }
}
