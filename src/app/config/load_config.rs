//! Settings loading from the process environment and working directory.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::configuration::parse_config_content;
use crate::domain::{AppError, DeployConfig, EnvSnapshot, Settings};

/// Default configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "flowdeploy.toml";

/// Variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "FLOWDEPLOY_CONFIG";

const DOTENV_FILE_NAME: &str = ".env";

/// Capture the process environment and load settings relative to `root`.
pub fn load_settings(root: &Path) -> Result<Settings, AppError> {
    load_settings_from(root, EnvSnapshot::from_pairs(utf8_vars(std::env::vars_os())))
}

/// Keep variables whose name and value are valid UTF-8; skip the rest.
fn utf8_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Vec<(String, String)> {
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                let name = key.unwrap_or_else(|raw| raw.to_string_lossy().into_owned());
                debug!(variable = %name, "Skipping environment variable that is not valid UTF-8");
                None
            }
        })
        .collect()
}

/// Load settings from an already captured environment.
///
/// `.env` in `root` fills variables missing from `env`. The configuration
/// file is optional unless `FLOWDEPLOY_CONFIG` names one explicitly.
pub fn load_settings_from(root: &Path, mut env: EnvSnapshot) -> Result<Settings, AppError> {
    let dotenv_path = root.join(DOTENV_FILE_NAME);
    if dotenv_path.is_file() {
        env.fill_missing(read_dotenv(&dotenv_path)?);
        debug!(path = %dotenv_path.display(), "Loaded .env file");
    }

    let config = match env.get(CONFIG_PATH_VAR) {
        Some(explicit) => {
            let path = resolve_path(root, explicit);
            if !path.is_file() {
                return Err(AppError::config_error(format!(
                    "Configuration file not found: {} (from {})",
                    path.display(),
                    CONFIG_PATH_VAR
                )));
            }
            read_config(&path)?
        }
        None => {
            let path = root.join(CONFIG_FILE_NAME);
            if path.is_file() { read_config(&path)? } else { DeployConfig::default() }
        }
    };

    Settings::from_sources(env, config)
}

fn read_dotenv(path: &Path) -> Result<Vec<(String, String)>, AppError> {
    let invalid =
        |e: dotenvy::Error| AppError::config_error(format!("Invalid {}: {}", path.display(), e));

    dotenvy::from_path_iter(path).map_err(invalid)?.map(|item| item.map_err(invalid)).collect()
}

fn read_config(path: &Path) -> Result<DeployConfig, AppError> {
    debug!(path = %path.display(), "Reading configuration file");
    let content = fs::read_to_string(path)?;
    parse_config_content(&content)
}

fn resolve_path(root: &Path, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() { path } else { root.join(path) }
}
