//! Credential storage.
//!
//! Reads/writes ~/.config/marksync/auth.json (0600 on Unix). The domain
//! is normalized on save so the HTTP client can assume a scheme prefix
//! and no trailing slash.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stored API credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token for the LMS API.
    pub token: String,
    /// LMS base URL (e.g., "https://school.instructure.com").
    pub domain: String,
    /// Display name of the token's owner (for `marksync login` output).
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Credentials {
    pub fn new(token: String, domain: &str) -> Self {
        Self {
            token,
            domain: normalize_domain(domain),
            user_name: None,
        }
    }
}

/// Normalize an LMS domain: add "https://" when no scheme is present,
/// strip trailing slashes and surrounding whitespace.
pub fn normalize_domain(domain: &str) -> String {
    let trimmed = domain.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Returns the path to the auth credentials file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("marksync/auth.json"))
}

/// Load saved credentials from disk.
/// Returns None if nothing is saved or the file is invalid.
pub fn load_auth() -> Option<Credentials> {
    let path = auth_file_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save credentials to disk, creating the parent directory if needed.
/// Sets 0600 permissions on Unix.
pub fn save_auth(creds: &Credentials) -> Result<(), String> {
    let path = auth_file_path().ok_or("Could not determine config directory")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {e}"))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {e}"))?;

    std::fs::write(&path, &contents).map_err(|e| format!("Failed to write auth file: {e}"))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {e}"))?;
    }

    Ok(())
}

/// Delete saved credentials.
pub fn delete_auth() -> Result<(), String> {
    let Some(path) = auth_file_path() else {
        return Ok(());
    };
    if path.exists() {
        std::fs::remove_file(&path).map_err(|e| format!("Failed to delete auth file: {e}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain() {
        assert_eq!(
            normalize_domain("school.instructure.com"),
            "https://school.instructure.com"
        );
        assert_eq!(
            normalize_domain("https://school.instructure.com/"),
            "https://school.instructure.com"
        );
        assert_eq!(
            normalize_domain("  http://lms.local///  "),
            "http://lms.local"
        );
    }

    #[test]
    fn test_credentials_roundtrip() {
        let creds = Credentials {
            token: "tok-123".into(),
            domain: "https://school.instructure.com".into(),
            user_name: Some("Ada Lovelace".into()),
        };

        let json = serde_json::to_string_pretty(&creds).unwrap();
        let parsed: Credentials = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.token, "tok-123");
        assert_eq!(parsed.domain, "https://school.instructure.com");
        assert_eq!(parsed.user_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_credentials_missing_optional_fields() {
        let json = r#"{"token":"tok","domain":"https://lms.test"}"#;
        let parsed: Credentials = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.token, "tok");
        assert!(parsed.user_name.is_none());
    }

    #[test]
    fn test_new_normalizes() {
        let creds = Credentials::new("tok".into(), "lms.test/");
        assert_eq!(creds.domain, "https://lms.test");
    }

    #[test]
    fn test_auth_file_path_exists() {
        let path = auth_file_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("marksync"));
        assert!(path.to_string_lossy().contains("auth.json"));
    }

    #[test]
    fn test_save_and_load_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");

        // Write and read manually since save_auth uses the real config path
        let creds = Credentials::new("tok123".into(), "lms.test");
        let json = serde_json::to_string_pretty(&creds).unwrap();
        std::fs::write(&path, &json).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: Credentials = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded.token, "tok123");
        assert_eq!(loaded.domain, "https://lms.test");
    }
}
