//! `galasactl home init` - create the Galasa home folder skeleton.

use anyhow::Result;
use jvm_launcher::env::OsEnvironment;
use jvm_launcher::GalasaHome;

pub async fn run() -> Result<()> {
    let home = GalasaHome::locate(&OsEnvironment)?;
    home.initialise()?;
    println!(
        "Galasa home folder ready at {}",
        home.native_folder_path().display()
    );
    Ok(())
}
