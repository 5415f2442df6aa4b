use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ContactsError;
use crate::oauth::GoogleAuthorizer;

pub mod types;

pub use types::{NewContact, Person, GET_PERSON_FIELDS, LIST_PERSON_FIELDS};

/// The four People API calls the tool handlers need.
///
/// Each call is one outbound request with no retries; failures propagate unchanged.
#[async_trait]
pub trait PeopleApi: Send + Sync {
    /// Up to `page_size` of the authenticated user's connections; empty when there are none.
    async fn list_connections(&self, page_size: u32) -> Result<Vec<Person>, ContactsError>;

    async fn get_person(&self, resource_name: &str) -> Result<Person, ContactsError>;

    async fn create_person(&self, contact: &NewContact) -> Result<Person, ContactsError>;

    /// Not idempotent: deleting the same resource twice fails the second time.
    async fn delete_person(&self, resource_name: &str) -> Result<(), ContactsError>;
}

pub struct GooglePeopleClient {
    client: reqwest::Client,
    base_url: String,
    auth: GoogleAuthorizer,
}

impl GooglePeopleClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        auth: GoogleAuthorizer,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// `{base}/{segments...}` with each segment percent-encoded on its own.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, ContactsError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ContactsError::Config(format!("invalid People API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ContactsError::Config("People API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resource names are opaque (`people/c123`); only their path segments are split out.
    fn person_endpoint(&self, resource_name: &str, suffix: &str) -> Result<Url, ContactsError> {
        if resource_name.trim().is_empty() {
            return Err(ContactsError::InvalidParams(
                "resource_name must not be empty".to_string(),
            ));
        }
        let mut segments: Vec<String> =
            resource_name.split('/').map(|s| s.to_string()).collect();
        if let Some(last) = segments.last_mut() {
            last.push_str(suffix);
        }
        self.endpoint(segments.iter().map(|s| s.as_str()))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ContactsError> {
        let token = self.auth.access_token().await?;
        let resp = request.bearer_auth(token).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = remote_error_message(&body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.clone()
            }
        });
        debug!(status = status.as_u16(), %message, "People API request failed");
        if status == StatusCode::NOT_FOUND {
            Err(ContactsError::NotFound(message))
        } else {
            Err(ContactsError::Remote {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ContactsError> {
        let bytes = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Google APIs report failures as `{"error": {"code": 404, "message": "..."}}`.
fn remote_error_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.pointer("/error/message")
        .and_then(|m| m.as_str())
        .or_else(|| v.get("error").and_then(|e| e.as_str()))
        .map(|s| s.to_string())
}

#[async_trait]
impl PeopleApi for GooglePeopleClient {
    async fn list_connections(&self, page_size: u32) -> Result<Vec<Person>, ContactsError> {
        let url = self.endpoint(["people", "me", "connections"])?;
        let page_size = page_size.max(1).to_string();
        debug!(%url, %page_size, "people.connections.list");
        let resp: types::ListConnectionsResponse = self
            .send_json(self.client.get(url).query(&[
                ("pageSize", page_size.as_str()),
                ("personFields", LIST_PERSON_FIELDS),
            ]))
            .await?;
        Ok(resp.connections.unwrap_or_default())
    }

    async fn get_person(&self, resource_name: &str) -> Result<Person, ContactsError> {
        let url = self.person_endpoint(resource_name, "")?;
        debug!(%url, "people.get");
        self.send_json(
            self.client
                .get(url)
                .query(&[("personFields", GET_PERSON_FIELDS)]),
        )
        .await
    }

    async fn create_person(&self, contact: &NewContact) -> Result<Person, ContactsError> {
        let url = self.endpoint(["people:createContact"])?;
        let body = contact.to_person();
        debug!(%url, "people.createContact");
        self.send_json(self.client.post(url).json(&body)).await
    }

    async fn delete_person(&self, resource_name: &str) -> Result<(), ContactsError> {
        let url = self.person_endpoint(resource_name, ":deleteContact")?;
        debug!(%url, "people.deleteContact");
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
