use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ContactsError;

pub const DEFAULT_PEOPLE_BASE_URL: &str = "https://people.googleapis.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_TOKEN_ACCOUNT: &str = "normal";

const CREDENTIALS_FILE: &str = "gcp-oauth.keys.json";

/// Runtime settings resolved once at process start.
#[derive(Debug, Clone)]
pub struct ContactsConfig {
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub token_account: String,
    pub people_base_url: String,
    pub token_url: String,
}

impl ContactsConfig {
    /// Resolve paths and endpoints from `GOOGLE_CONTACTS_*` environment variables,
    /// falling back to the shared token location used by the Google calendar server.
    pub fn from_env() -> Result<Self, ContactsError> {
        let credentials_path = match std::env::var_os("GOOGLE_CONTACTS_CREDENTIALS") {
            Some(p) => PathBuf::from(p),
            None => default_credentials_path(),
        };
        let token_path = match std::env::var_os("GOOGLE_CONTACTS_TOKENS") {
            Some(p) => PathBuf::from(p),
            None => default_token_path()?,
        };
        let token_account = std::env::var("GOOGLE_CONTACTS_TOKEN_ACCOUNT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_ACCOUNT.to_string());

        let config = Self {
            credentials_path,
            token_path,
            token_account,
            people_base_url: env_url("GOOGLE_CONTACTS_PEOPLE_URL", DEFAULT_PEOPLE_BASE_URL)?,
            token_url: env_url("GOOGLE_CONTACTS_TOKEN_URL", DEFAULT_TOKEN_URL)?,
        };
        tracing::debug!(?config, "resolved contacts config");
        Ok(config)
    }
}

fn env_url(var: &str, default: &str) -> Result<String, ContactsError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw)
        .map_err(|e| ContactsError::Config(format!("{} is not a valid URL: {}", var, e)))?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Prefer a credentials file shipped next to the binary, then the working directory.
fn default_credentials_path() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CREDENTIALS_FILE)));
    match beside_exe {
        Some(p) if p.exists() => p,
        _ => PathBuf::from(CREDENTIALS_FILE),
    }
}

fn default_token_path() -> Result<PathBuf, ContactsError> {
    let home = dirs::home_dir()
        .ok_or_else(|| ContactsError::Config("cannot determine home directory".to_string()))?;
    Ok(home
        .join(".config")
        .join("google-calendar-mcp")
        .join("tokens.json"))
}

/// OAuth client identity from a Google Cloud console download.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthClientSecrets {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
}

#[derive(Deserialize)]
struct CredentialsFile {
    installed: Option<OAuthClientSecrets>,
    web: Option<OAuthClientSecrets>,
}

impl OAuthClientSecrets {
    pub fn load(path: &Path) -> Result<Self, ContactsError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ContactsError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ContactsError> {
        let file: CredentialsFile = serde_json::from_str(raw)?;
        file.installed.or(file.web).ok_or_else(|| {
            ContactsError::Config(
                "credentials file has neither an 'installed' nor a 'web' client".to_string(),
            )
        })
    }
}
