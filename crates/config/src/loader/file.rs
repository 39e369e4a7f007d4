//! Config file loading.
//!
//! Responsibilities:
//! - Read a JSON `FileConfig` from the configured path.
//! - Apply its settings to a ConfigLoader instance.
//!
//! Invariants:
//! - File settings only fill fields still unset, so env vars and builder values
//!   take precedence whichever order the loader methods are called in.
//! - Without a builder path, `CAS_CONFIG_PATH` names the file.
//! - A missing file at an explicitly configured path is an error, not a silent no-op.
//! - Parse errors never include file contents, which may hold a password.

use std::time::Duration;

use super::builder::ConfigLoader;
use super::env::env_var_or_none;
use super::error::ConfigError;
use crate::types::FileConfig;

/// Read the config file named by the loader, if any, and apply it.
pub fn apply_file(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if loader.config_path().is_none()
        && let Some(config_path) = env_var_or_none("CAS_CONFIG_PATH")
    {
        loader.set_config_path(Some(std::path::PathBuf::from(config_path)));
    }

    let Some(path) = loader.config_path().cloned() else {
        return Ok(());
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "Failed to read config file");
        ConfigError::ConfigFileRead { path: path.clone() }
    })?;

    let file: FileConfig = serde_json::from_str(&contents).map_err(|e| {
        tracing::debug!(
            path = %path.display(),
            line = e.line(),
            column = e.column(),
            "Failed to parse config file"
        );
        ConfigError::ConfigFileParse { path: path.clone() }
    })?;

    apply_file_config(loader, file);
    Ok(())
}

fn apply_file_config(loader: &mut ConfigLoader, file: FileConfig) {
    loader.fill_ticket_service_url(file.ticket_service_url);
    loader.fill_service_url(file.service_url);
    loader.fill_login_redirect_url(file.login_redirect_url);
    loader.fill_ticket_param(file.ticket_param);
    loader.fill_username(file.username);
    loader.fill_password(file.password);
    loader.fill_skip_verify(file.skip_verify);
    loader.fill_timeout(file.timeout_seconds.map(Duration::from_secs));
    loader.fill_max_redirects(file.max_redirects);
}
