//! Per-account credential persistence.
//!
//! One opaque postcard blob per account under the configured store
//! directory, named `<account>.cred`. Saves are atomic (temp file + rename)
//! so a crash mid-write never leaves a half-decoded credential behind.

use std::path::{Path, PathBuf};

use {thiserror::Error, tracing::debug};

use {wagate_common::GatewayError, wagate_wire::Credential};

/// File extension for persisted credential blobs.
pub const CREDENTIAL_EXT: &str = "cred";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no credential for {0}")]
    NotFound(String),

    /// The file exists but does not decode as credential material.
    #[error("credential for {0} is corrupt")]
    Corrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(account) => GatewayError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no credential for {account}"),
            )),
            StoreError::Corrupt(account) => GatewayError::CorruptCredential(account),
            StoreError::Io(e) => GatewayError::Io(e),
        }
    }
}

/// File-backed credential store, keyed by account id.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, account_id: &str) -> PathBuf {
        self.dir.join(format!("{account_id}.{CREDENTIAL_EXT}"))
    }

    pub fn load(&self, account_id: &str) -> Result<Credential, StoreError> {
        let path = self.path_for(account_id);
        let bytes = std::fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(account_id.to_string())
            } else {
                StoreError::Io(e)
            }
        })?;
        postcard::from_bytes(&bytes).map_err(|_| StoreError::Corrupt(account_id.to_string()))
    }

    pub fn save(&self, account_id: &str, credential: &Credential) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let bytes = postcard::to_allocvec(credential)
            .map_err(|_| StoreError::Corrupt(account_id.to_string()))?;
        let path = self.path_for(account_id);
        let tmp = self.dir.join(format!(".{account_id}.{CREDENTIAL_EXT}.tmp"));
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, &path)?;
        debug!(account = account_id, path = %path.display(), "credential saved");
        Ok(())
    }

    pub fn exists(&self, account_id: &str) -> bool {
        self.path_for(account_id).exists()
    }

    /// Remove the persisted credential. A missing file is not an error.
    pub fn delete(&self, account_id: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(account_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Account ids with a persisted credential, for the startup sweep.
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut accounts: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| account_from_path(&e.path()))
            .collect();
        accounts.sort();
        accounts
    }
}

fn account_from_path(path: &Path) -> Option<String> {
    if path.extension()?.to_str()? != CREDENTIAL_EXT {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    // Skip in-flight temp files.
    if stem.starts_with('.') {
        return None;
    }
    Some(stem.to_string())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::credential;

    fn store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("store"));
        (dir, store)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();
        let cred = credential("628111@s.whatsapp.net");
        store.save("628111", &cred).unwrap();
        assert_eq!(store.load("628111").unwrap(), cred);
        assert!(store.exists("628111"));
    }

    #[test]
    fn load_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.load("628111"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn load_garbage_is_corrupt() {
        let (_dir, store) = store();
        store.save("628111", &credential("w")).unwrap();
        std::fs::write(store.path_for("628111"), b"\xff\xfe not a credential").unwrap();
        assert!(matches!(store.load("628111"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn delete_missing_is_ok() {
        let (_dir, store) = store();
        store.delete("628111").unwrap();
    }

    #[test]
    fn list_returns_persisted_accounts() {
        let (_dir, store) = store();
        store.save("628111", &credential("a")).unwrap();
        store.save("628222", &credential("b")).unwrap();
        std::fs::write(store.dir.join("notes.txt"), b"ignored").unwrap();
        assert_eq!(store.list(), vec!["628111", "628222"]);
    }

    #[test]
    fn list_on_missing_dir_is_empty() {
        let (_dir, store) = store();
        assert!(store.list().is_empty());
    }

    #[test]
    fn save_overwrites_previous_blob() {
        let (_dir, store) = store();
        store.save("628111", &credential("old")).unwrap();
        store.save("628111", &credential("new")).unwrap();
        assert_eq!(store.load("628111").unwrap().wid, "new");
    }
}
