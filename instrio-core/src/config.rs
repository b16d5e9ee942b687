//! User configuration for locating the instrument I/O library.
//!
//! ```toml
//! [paths]
//! visa_library = "/my/path/visa.so"
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".instriorc";
pub const PREFIX_ENV: &str = "INSTRIO_PREFIX";
pub const LIBRARY_ENV: &str = "INSTRIO_LIBRARY";

#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub paths: PathsSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct PathsSection {
    pub visa_library: Option<PathBuf>,
}

impl UserConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Configuration files in the order they are read. Later files win.
pub fn config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Some(prefix) = std::env::var_os(PREFIX_ENV) {
        files.push(
            PathBuf::from(prefix)
                .join("share")
                .join("instrio")
                .join(CONFIG_FILE_NAME),
        );
    }

    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        files.push(PathBuf::from(home).join(CONFIG_FILE_NAME));
    }

    files
}

/// Library path from the default configuration files, if any sets one.
pub fn read_user_library_path() -> Result<Option<PathBuf>> {
    read_library_path_from(&config_files())
}

/// Library path from `files`; missing files are skipped.
pub fn read_library_path_from(files: &[PathBuf]) -> Result<Option<PathBuf>> {
    let mut library = None;
    let mut read_any = false;

    for file in files.iter().filter(|f| f.is_file()) {
        log::debug!("Reading user configuration {}", file.display());
        read_any = true;
        if let Some(path) = UserConfig::from_file(file)?.paths.visa_library {
            library = Some(path);
        }
    }

    if !read_any {
        log::debug!("No user configuration files found");
    } else if library.is_none() {
        log::debug!("No [paths] visa_library entry in user configuration");
    }
    Ok(library)
}

/// Library path from `INSTRIO_LIBRARY`, ignoring an empty value.
pub fn library_path_from_env() -> Option<PathBuf> {
    std::env::var_os(LIBRARY_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
