//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// File name of the SQLite database inside the root folder
pub const DATABASE_FILE: &str = "antguide.db";

/// Environment variable consulted for the root folder
pub const ROOT_FOLDER_ENV: &str = "ANTGUIDE_ROOT";

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Path of the database file inside a resolved root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Create the root folder if it does not exist yet
pub fn ensure_root_folder(root_folder: &Path) -> Result<()> {
    std::fs::create_dir_all(root_folder)?;
    Ok(())
}

/// Get default configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/antguide/config.toml first, then /etc/antguide/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("antguide").join("config.toml"));
        let system_config = PathBuf::from("/etc/antguide/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_path = dirs::config_dir()
        .map(|d| d.join("antguide").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("antguide"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\antguide"))
    } else {
        // ~/.local/share/antguide on Linux, ~/Library/Application Support/antguide on macOS
        dirs::data_local_dir()
            .map(|d| d.join("antguide"))
            .unwrap_or_else(|| PathBuf::from("./antguide_data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some("/tmp/antguide-test"));
        assert_eq!(root, PathBuf::from("/tmp/antguide-test"));
    }

    #[test]
    fn database_path_appends_file_name() {
        let path = database_path(Path::new("/srv/antguide"));
        assert_eq!(path, PathBuf::from("/srv/antguide/antguide.db"));
    }
}
