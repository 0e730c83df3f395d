use super::file_system::FileSystem;
use anyhow::{Result, bail};
use std::path::Path;

pub fn validate_directory_exists(file_system: &impl FileSystem, path: &Path) -> Result<()> {
    if !file_system.exists(path) {
        bail!(
            "The path '{}' does not exist. Please check and try again.",
            path.display()
        );
    }
    if !file_system.is_dir(path) {
        bail!("The path '{}' is not a directory.", path.display());
    }
    Ok(())
}
