//! Token storage.
//!
//! Reads/writes ~/.config/sheetframe/auth.json (0600 on Unix).
//! The token is an OAuth access token with the spreadsheets and drive scopes;
//! obtaining and refreshing it happens outside sheetframe.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// Authentication credentials stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token sent with every request
    pub token: String,
    /// Account email (for display)
    #[serde(default)]
    pub email: Option<String>,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), email: None }
    }
}

/// Returns the path to the auth credentials file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("sheetframe/auth.json"))
}

/// Load saved auth credentials from the default location.
/// Returns None if no credentials are saved or if the file is invalid.
pub fn load_auth() -> Option<Credentials> {
    load_auth_from(&auth_file_path()?)
}

pub fn load_auth_from(path: &Path) -> Option<Credentials> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(creds) => Some(creds),
        Err(e) => {
            log::warn!("Ignoring unreadable auth file {}: {}", path.display(), e);
            None
        }
    }
}

/// Save auth credentials to the default location.
pub fn save_auth(creds: &Credentials) -> Result<(), String> {
    let path = auth_file_path().ok_or("Could not determine config directory")?;
    save_auth_to(&path, creds)
}

/// Save auth credentials to `path`.
/// Creates the parent directory if it doesn't exist.
/// Sets 0600 permissions on Unix.
pub fn save_auth_to(path: &Path, creds: &Credentials) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

    std::fs::write(path, &contents)
        .map_err(|e| format!("Failed to write auth file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Delete saved auth credentials.
pub fn delete_auth() -> Result<(), String> {
    let Some(path) = auth_file_path() else {
        return Ok(());
    };
    if path.exists() {
        std::fs::remove_file(&path)
            .map_err(|e| format!("Failed to delete auth file: {}", e))?;
    }
    Ok(())
}
