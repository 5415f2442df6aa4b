use rmcp::model::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    connectors::google_people::{NewContact, PeopleApi},
    records::{self, ContactDetail, ContactSummary, CreatedContact},
    tools::{self, ContactTool},
    ContactsError,
};

pub const SERVER_NAME: &str = "google-contacts";

/// Routes tool invocations to the People API and shapes the answers.
///
/// Every handler failure is reduced here to a single `ToolExecution` fault; unknown
/// tool names become `UnknownTool` without touching the API.
pub struct McpServer {
    people: Arc<dyn PeopleApi>,
}

impl McpServer {
    pub fn new(people: Arc<dyn PeopleApi>) -> Self {
        Self { people }
    }

    pub fn get_capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: Some(Default::default()),
            ..Default::default()
        }
    }

    /// Handle initialize request
    pub async fn handle_initialize(
        &self,
        _request: InitializeRequestParam,
    ) -> Result<InitializeResult, ContactsError> {
        info!("MCP Server initializing");

        Ok(InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: self.get_capabilities(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Search, list, read, create and delete Google Contacts of the signed-in user."
                    .to_string(),
            ),
        })
    }

    pub async fn handle_list_tools(&self) -> Result<ListToolsResult, ContactsError> {
        Ok(ListToolsResult {
            tools: tools::catalog(),
            next_cursor: None,
        })
    }

    pub async fn handle_call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ContactsError> {
        let tool = ContactTool::from_name(&request.name)
            .ok_or_else(|| ContactsError::UnknownTool(request.name.to_string()))?;
        let args = request.arguments.unwrap_or_default();
        debug!(tool = tool.name(), "calling tool");

        let text = match tool {
            ContactTool::ListContacts => self.list_contacts(&args).await,
            ContactTool::SearchContacts => self.search_contacts(&args).await,
            ContactTool::GetContact => self.get_contact(&args).await,
            ContactTool::CreateContact => self.create_contact(&args).await,
            ContactTool::DeleteContact => self.delete_contact(&args).await,
        }
        .map_err(|e| {
            warn!(tool = tool.name(), code = e.code_str(), "tool failed: {}", e);
            ContactsError::tool_execution(&e)
        })?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    async fn list_contacts(&self, args: &JsonObject) -> Result<String, ContactsError> {
        let max_results = max_results(args, tools::DEFAULT_LIST_MAX_RESULTS);
        let people = self.people.list_connections(max_results).await?;
        let contacts: Vec<ContactSummary> = people
            .iter()
            .take(max_results as usize)
            .map(ContactSummary::from)
            .collect();
        Ok(serde_json::to_string_pretty(&contacts)?)
    }

    async fn search_contacts(&self, args: &JsonObject) -> Result<String, ContactsError> {
        let query = required_str(args, "query")?;
        let max_results = max_results(args, tools::DEFAULT_SEARCH_MAX_RESULTS);
        let people = self.people.list_connections(tools::SEARCH_SCAN_SIZE).await?;

        let needle = query.to_lowercase();
        let matches: Vec<ContactSummary> = people
            .iter()
            .filter(|p| records::matches_query(p, &needle))
            .take(max_results as usize)
            .map(ContactSummary::from)
            .collect();
        debug!(scanned = people.len(), matched = matches.len(), "search_contacts");

        if matches.is_empty() {
            return Ok(format!("No contacts found matching \"{}\"", query));
        }
        Ok(serde_json::to_string_pretty(&matches)?)
    }

    async fn get_contact(&self, args: &JsonObject) -> Result<String, ContactsError> {
        let resource_name = required_str(args, "resource_name")?;
        let person = self.people.get_person(resource_name).await?;
        Ok(serde_json::to_string_pretty(&ContactDetail::from(&person))?)
    }

    async fn create_contact(&self, args: &JsonObject) -> Result<String, ContactsError> {
        let contact = NewContact {
            given_name: optional_str(args, "given_name"),
            family_name: optional_str(args, "family_name"),
            email: optional_str(args, "email"),
            phone: optional_str(args, "phone"),
            organization: optional_str(args, "organization"),
            job_title: optional_str(args, "job_title"),
        };
        let person = self.people.create_person(&contact).await?;
        let created = CreatedContact::from(&person);
        info!(resource_name = %created.resource_name, "contact created");
        Ok(format!(
            "Contact created successfully:\n{}",
            serde_json::to_string_pretty(&created)?
        ))
    }

    async fn delete_contact(&self, args: &JsonObject) -> Result<String, ContactsError> {
        let resource_name = required_str(args, "resource_name")?;
        self.people.delete_person(resource_name).await?;
        info!(%resource_name, "contact deleted");
        Ok(format!("Contact {} deleted successfully", resource_name))
    }
}

fn required_str<'a>(args: &'a JsonObject, key: &str) -> Result<&'a str, ContactsError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ContactsError::InvalidParams(format!("{} is required", key)))
}

fn optional_str(args: &JsonObject, key: &str) -> Option<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Absent, non-numeric or sub-1 values fall back to `default`; fractions are truncated.
fn max_results(args: &JsonObject, default: u32) -> u32 {
    args.get("max_results")
        .and_then(|v| v.as_f64())
        .filter(|n| *n >= 1.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or(default)
}

/// JSON-RPC message handler for the MCP server
pub struct JsonRpcHandler {
    server: McpServer,
}

impl JsonRpcHandler {
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }

    /// Process one JSON-RPC message. Notifications (no `id`) produce no response.
    pub async fn handle_request(&self, request: Value) -> Option<Value> {
        debug!("Handling JSON-RPC request: {:?}", request);

        let method = request.get("method").and_then(|m| m.as_str()).unwrap_or("");
        let Some(id) = request.get("id").cloned() else {
            debug!(method, "notification received");
            return None;
        };
        let params = match request.get("params") {
            Some(Value::Null) | None => json!({}),
            Some(p) => p.clone(),
        };

        let result = match method {
            "initialize" => match serde_json::from_value::<InitializeRequestParam>(params) {
                Ok(req) => self
                    .server
                    .handle_initialize(req)
                    .await
                    .and_then(|r| serde_json::to_value(r).map_err(ContactsError::SerdeJson))
                    .map_err(|e| e.to_jsonrpc_error()),
                Err(e) => Err(ContactsError::InvalidParams(e.to_string()).to_jsonrpc_error()),
            },
            "ping" => Ok(json!({})),
            "tools/list" => self
                .server
                .handle_list_tools()
                .await
                .and_then(|r| serde_json::to_value(r).map_err(ContactsError::SerdeJson))
                .map_err(|e| e.to_jsonrpc_error()),
            "tools/call" => match serde_json::from_value::<CallToolRequestParam>(params) {
                Ok(req) => self
                    .server
                    .handle_call_tool(req)
                    .await
                    .and_then(|r| serde_json::to_value(r).map_err(ContactsError::SerdeJson))
                    .map_err(|e| e.to_jsonrpc_error()),
                Err(e) => Err(ContactsError::InvalidParams(e.to_string()).to_jsonrpc_error()),
            },
            _ => Err(ContactsError::MethodNotFound.to_jsonrpc_error()),
        };

        Some(match result {
            Ok(result) => json!({
                "jsonrpc": "2.0",
                "result": result,
                "id": id,
            }),
            Err(error) => json!({
                "jsonrpc": "2.0",
                "error": error,
                "id": id,
            }),
        })
    }
}
