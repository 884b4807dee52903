//! API key storage — shared with any other Crucible front end.
//!
//! Reads/writes ~/.config/crucible/auth.json (0600 on Unix).
//! If one tool has already logged in, the others pick it up automatically.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Default production API base.
pub const DEFAULT_API_BASE: &str = "https://crucible.dreadnode.io/api";

/// Credentials stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCredentials {
    /// API key, sent verbatim as the `Authorization` header value
    /// (the Crucible service does not use a `Bearer` prefix).
    pub api_key: String,
    /// API base URL (e.g., "https://crucible.dreadnode.io/api")
    pub api_base: String,
}

impl AuthCredentials {
    pub fn new(api_key: String, api_base: String) -> Self {
        Self { api_key, api_base }
    }
}

/// Returns the path to the auth credentials file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("crucible/auth.json"))
}

/// Load saved credentials from disk.
/// Returns None if no credentials are saved or if the file is invalid.
pub fn load_auth() -> Option<AuthCredentials> {
    let path = auth_file_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save credentials to disk.
/// Creates the parent directory if it doesn't exist.
/// Sets 0600 permissions on Unix.
pub fn save_auth(creds: &AuthCredentials) -> Result<(), String> {
    let path = auth_file_path().ok_or("Could not determine config directory")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

    std::fs::write(&path, &contents)
        .map_err(|e| format!("Failed to write auth file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Delete saved credentials.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_credentials_roundtrip() {
        let creds = AuthCredentials {
            api_key: "crucible-key-123".into(),
            api_base: "https://crucible.dreadnode.io/api".into(),
        };

        let json = serde_json::to_string_pretty(&creds).unwrap();
        let parsed: AuthCredentials = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.api_key, "crucible-key-123");
        assert_eq!(parsed.api_base, "https://crucible.dreadnode.io/api");
    }

    #[test]
    fn test_auth_file_path_exists() {
        let path = auth_file_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("crucible"));
        assert!(path.to_string_lossy().contains("auth.json"));
    }

    #[test]
    fn test_save_and_load_auth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");

        // Manually write and read since save_auth uses the real config path
        let creds = AuthCredentials::new("key123".into(), "https://api.test".into());
        let json = serde_json::to_string_pretty(&creds).unwrap();
        std::fs::write(&path, &json).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: AuthCredentials = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded.api_key, "key123");
        assert_eq!(loaded.api_base, "https://api.test");
    }

    #[test]
    fn test_default_api_base() {
        assert!(DEFAULT_API_BASE.starts_with("https://"));
        assert!(!DEFAULT_API_BASE.ends_with('/'));
    }
}
