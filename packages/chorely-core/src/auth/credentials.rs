//! Persisted session storage with optional platform keyring.
//!
//! Storage priority:
//! 1. Platform keyring (if `keyring-storage` feature enabled and available)
//! 2. File-based storage (`<config_dir>/chorely/.session`, owner-only on Unix)

use super::session::Session;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "keyring-storage")]
use keyring::Entry;

/// Service name used for keyring storage
#[cfg(feature = "keyring-storage")]
const KEYRING_SERVICE: &str = "chorely";
/// Username used for keyring entry
#[cfg(feature = "keyring-storage")]
const KEYRING_USER: &str = "session";

/// Get the chorely config directory
fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .context("Failed to find config directory")?;
    Ok(config_dir.join("chorely"))
}

/// Get the session file path for file-based storage
fn get_session_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(".session"))
}

// ============================================================================
// File-based session storage (always available)
// ============================================================================

fn save_session_to_file(path: &Path, session: &Session) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
    }

    let json = serde_json::to_string(session).context("Failed to serialize session")?;

    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        let file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .context("Failed to create session file")?;
        let mut file = std::io::BufWriter::new(file);
        file.write_all(json.as_bytes())
            .context("Failed to write session")?;
        file.flush().context("Failed to write session")?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, &json).context("Failed to write session file")?;
    }

    tracing::debug!("Session saved to file: {:?}", path);
    Ok(())
}

fn load_session_from_file(path: &Path) -> Result<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).context("Failed to read session file")?;
    let session: Session =
        serde_json::from_str(&content).context("Failed to parse session file")?;
    tracing::debug!("Session loaded from file");
    Ok(Some(session))
}

fn delete_session_file(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Failed to delete session file: {}", e);
        }
    }
}

// ============================================================================
// Keyring-based session storage (optional, platform-specific)
// ============================================================================

#[cfg(feature = "keyring-storage")]
fn get_keyring_entry() -> Result<Entry> {
    Entry::new(KEYRING_SERVICE, KEYRING_USER)
        .map_err(|e| anyhow::anyhow!("Failed to create keyring entry: {}", e))
}

#[cfg(feature = "keyring-storage")]
fn save_session_to_keyring(session: &Session) -> Result<()> {
    let json = serde_json::to_string(session).context("Failed to serialize session")?;
    get_keyring_entry()?
        .set_password(&json)
        .map_err(|e| anyhow::anyhow!("Failed to store session in keyring: {}", e))
}

#[cfg(feature = "keyring-storage")]
fn load_session_from_keyring() -> Result<Option<Session>> {
    match get_keyring_entry()?.get_password() {
        Ok(json) => {
            let session: Session =
                serde_json::from_str(&json).context("Failed to parse session from keyring")?;
            tracing::debug!("Session loaded from keyring");
            Ok(Some(session))
        }
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(anyhow::anyhow!("Failed to read session from keyring: {}", e)),
    }
}

#[cfg(feature = "keyring-storage")]
fn delete_session_from_keyring() {
    if let Ok(entry) = get_keyring_entry() {
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(e) => tracing::warn!("Failed to delete session from keyring: {}", e),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Load the persisted session, if any.
///
/// Falls back to file storage when the keyring is unavailable or empty.
pub fn load_session() -> Result<Option<Session>> {
    #[cfg(feature = "keyring-storage")]
    match load_session_from_keyring() {
        Ok(Some(session)) => return Ok(Some(session)),
        Ok(None) => tracing::debug!("No session in keyring, trying file fallback"),
        Err(e) => tracing::warn!("{}, trying file fallback", e),
    }

    load_session_from_file(&get_session_file_path()?)
}

/// Persist the session. An empty session deletes any stored one.
pub fn save_session(session: &Session) -> Result<()> {
    if session.is_empty() {
        return delete_session();
    }

    #[cfg(feature = "keyring-storage")]
    match save_session_to_keyring(session) {
        Ok(()) => {
            tracing::debug!("Session saved to keyring");
            return Ok(());
        }
        Err(e) => tracing::warn!("{}, using file storage", e),
    }

    save_session_to_file(&get_session_file_path()?, session)
}

/// Delete the session from all storage locations.
pub fn delete_session() -> Result<()> {
    #[cfg(feature = "keyring-storage")]
    delete_session_from_keyring();

    delete_session_file(&get_session_file_path()?);
    Ok(())
}

/// Describe where sessions are stored (for status output)
pub fn get_session_storage_info() -> String {
    #[cfg(feature = "keyring-storage")]
    {
        "Platform keyring (with file fallback)".to_string()
    }
    #[cfg(not(feature = "keyring-storage"))]
    {
        let path = get_session_file_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "~/.config/chorely/.session".to_string());
        format!("File-based storage: {}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_session() -> Session {
        Session {
            access_token: Some("access".into()),
            refresh_token: Some("refresh".into()),
            user: Some(json!({"id": "u1", "email": "p@example.com", "name": "Pat"})),
        }
    }

    #[test]
    fn test_file_storage_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(".session");

        assert!(load_session_from_file(&path).unwrap().is_none());

        save_session_to_file(&path, &sample_session()).unwrap();
        assert_eq!(load_session_from_file(&path).unwrap(), Some(sample_session()));

        delete_session_file(&path);
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".session");
        save_session_to_file(&path, &sample_session()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".session");
        fs::write(&path, "{not json").unwrap();
        assert!(load_session_from_file(&path).is_err());
    }
}
