use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::OAuthClientSecrets;
use crate::error::ContactsError;
use crate::token_store::{StoredTokens, TokenStore};

/// Refresh this long before the recorded expiry.
const EXPIRY_SKEW_MS: i64 = 60_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub async fn google_refresh_token(
    http: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: Option<&str>,
    refresh_token: &str,
) -> Result<OAuthTokens, ContactsError> {
    let mut body = vec![
        ("grant_type", "refresh_token".to_string()),
        ("client_id", client_id.to_string()),
        ("refresh_token", refresh_token.to_string()),
    ];
    if let Some(cs) = client_secret {
        if !cs.is_empty() {
            body.push(("client_secret", cs.to_string()));
        }
    }
    let resp = http.post(token_url).form(&body).send().await?;
    let status = resp.status();
    let v = resp.json::<serde_json::Value>().await?;
    if !status.is_success() {
        let reason = v
            .get("error_description")
            .or_else(|| v.get("error"))
            .and_then(|s| s.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| v.to_string());
        return Err(ContactsError::Authentication(format!(
            "refresh failed: {}",
            reason
        )));
    }
    Ok(serde_json::from_value(v)?)
}

/// Hands out bearer tokens for the People API, refreshing them when they expire.
pub struct GoogleAuthorizer {
    http: reqwest::Client,
    token_url: String,
    secrets: OAuthClientSecrets,
    account: String,
    store: Arc<dyn TokenStore>,
    tokens: Mutex<StoredTokens>,
}

impl GoogleAuthorizer {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        secrets: OAuthClientSecrets,
        account: impl Into<String>,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ContactsError> {
        let account = account.into();
        let tokens = store.load(&account)?.ok_or_else(|| {
            ContactsError::Authentication(format!("no stored tokens for account '{}'", account))
        })?;
        if tokens.access_token.is_none() && tokens.refresh_token.is_none() {
            return Err(ContactsError::Authentication(format!(
                "account '{}' has neither an access_token nor a refresh_token",
                account
            )));
        }
        Ok(Self {
            http,
            token_url: token_url.into(),
            secrets,
            account,
            store,
            tokens: Mutex::new(tokens),
        })
    }

    /// Current access token; refreshed first when missing or within a minute of expiry.
    pub async fn access_token(&self) -> Result<String, ContactsError> {
        let mut tokens = self.tokens.lock().await;
        if let Some(at) = tokens.access_token.as_ref() {
            let fresh = match tokens.expiry_date {
                Some(exp) => exp - EXPIRY_SKEW_MS > now_millis(),
                None => true,
            };
            if fresh {
                return Ok(at.clone());
            }
        }

        let rt = tokens.refresh_token.clone().ok_or_else(|| {
            ContactsError::Authentication(
                "access token expired and no refresh_token is stored".to_string(),
            )
        })?;
        debug!(account = %self.account, "refreshing Google access token");
        let refreshed = google_refresh_token(
            &self.http,
            &self.token_url,
            &self.secrets.client_id,
            self.secrets.client_secret.as_deref(),
            &rt,
        )
        .await?;

        tokens.access_token = Some(refreshed.access_token.clone());
        if let Some(r) = refreshed.refresh_token {
            tokens.refresh_token = Some(r);
        }
        if refreshed.scope.is_some() {
            tokens.scope = refreshed.scope;
        }
        if refreshed.token_type.is_some() {
            tokens.token_type = refreshed.token_type;
        }
        tokens.expiry_date = refreshed.expires_in.map(|ex| now_millis() + ex * 1000);

        if let Err(e) = self.store.save(&self.account, &tokens) {
            tracing::warn!("could not persist refreshed tokens: {}", e);
        } else {
            info!(account = %self.account, "persisted refreshed Google tokens");
        }
        Ok(refreshed.access_token)
    }
}
