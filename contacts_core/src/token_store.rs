use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io;
use std::path::PathBuf;

use crate::error::ContactsError;

/// OAuth tokens as written by the Google auth libraries (`expiry_date` in epoch millis).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
    /// Fields we do not interpret (`id_token`, ...) survive a save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub trait TokenStore: Send + Sync {
    fn load(&self, account: &str) -> Result<Option<StoredTokens>, ContactsError>;
    fn save(&self, account: &str, tokens: &StoredTokens) -> Result<(), ContactsError>;
}

/// A simple in-memory store, mainly for testing.
pub struct MemoryTokenStore {
    map: std::sync::Mutex<std::collections::HashMap<String, StoredTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            map: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }

    pub fn with_account(account: &str, tokens: StoredTokens) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.map.lock() {
            map.insert(account.to_string(), tokens);
        }
        store
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, account: &str) -> Result<Option<StoredTokens>, ContactsError> {
        let map = self
            .map
            .lock()
            .map_err(|e| ContactsError::Authentication(format!("lock poisoned: {}", e)))?;
        Ok(map.get(account).cloned())
    }

    fn save(&self, account: &str, tokens: &StoredTokens) -> Result<(), ContactsError> {
        self.map
            .lock()
            .map_err(|e| ContactsError::Authentication(format!("lock poisoned: {}", e)))?
            .insert(account.to_string(), tokens.clone());
        Ok(())
    }
}

/// JSON token file keyed by account name, e.g. `{"normal": {"access_token": ...}}`.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `None` when the file does not exist. Any other read or parse failure is an error,
    /// since the file may belong to another process mid-write.
    fn read_map(&self) -> Result<Option<Map<String, Value>>, ContactsError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ContactsError::Config(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            ContactsError::Config(format!("cannot parse {}: {}", self.path.display(), e))
        })?;
        match value {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(ContactsError::Config(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), ContactsError> {
        let s = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, s)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, account: &str) -> Result<Option<StoredTokens>, ContactsError> {
        let map = self.read_map()?.ok_or_else(|| {
            ContactsError::Config(format!(
                "token file {} not found; authorize with the Google calendar MCP server first",
                self.path.display()
            ))
        })?;
        match map.get(account) {
            Some(v) => Ok(Some(serde_json::from_value(v.clone())?)),
            None => Ok(None),
        }
    }

    fn save(&self, account: &str, tokens: &StoredTokens) -> Result<(), ContactsError> {
        let mut map = self.read_map()?.unwrap_or_default();
        map.insert(account.to_string(), serde_json::to_value(tokens)?);
        self.write_map(&map)
    }
}
