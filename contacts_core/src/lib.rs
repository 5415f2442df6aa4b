// src/lib.rs
pub mod config;
pub mod connectors;
pub mod error;
pub mod mcp_server;
pub mod oauth;
pub mod records;
pub mod token_store;
pub mod tools;
pub mod transport;

use std::sync::Arc;

// Re-export the rmcp types that appear in this crate's public API.
pub use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, InitializeResult, JsonObject, ListToolsResult,
    RawContent, TextContent, Tool,
};

pub use crate::config::{ContactsConfig, OAuthClientSecrets};
pub use crate::connectors::google_people::{GooglePeopleClient, NewContact, PeopleApi, Person};
pub use crate::error::ContactsError;
pub use crate::mcp_server::{JsonRpcHandler, McpServer};
pub use crate::transport::StdioTransport;

use crate::oauth::GoogleAuthorizer;
use crate::token_store::FileTokenStore;

/// Build the authenticated People API client described by `config`.
///
/// Reads the OAuth client file and the stored tokens; no network call is made
/// until the first tool invocation.
pub fn build_people_client(config: &ContactsConfig) -> Result<GooglePeopleClient, ContactsError> {
    let secrets = OAuthClientSecrets::load(&config.credentials_path)?;
    let store = Arc::new(FileTokenStore::new(&config.token_path));

    let http = reqwest::Client::builder()
        .user_agent(concat!("google-contacts-mcp/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let auth = GoogleAuthorizer::new(
        http.clone(),
        config.token_url.clone(),
        secrets,
        config.token_account.clone(),
        store,
    )?;
    Ok(GooglePeopleClient::new(http, config.people_base_url.clone(), auth))
}
