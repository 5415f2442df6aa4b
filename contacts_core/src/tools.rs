use rmcp::model::{JsonObject, Tool};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::sync::Arc;

pub const DEFAULT_SEARCH_MAX_RESULTS: u32 = 10;
pub const DEFAULT_LIST_MAX_RESULTS: u32 = 100;

/// Connections scanned per search, independent of `max_results`. Contacts beyond this
/// first page are never searched.
pub const SEARCH_SCAN_SIZE: u32 = 500;

/// The fixed set of tools this server publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactTool {
    SearchContacts,
    ListContacts,
    GetContact,
    CreateContact,
    DeleteContact,
}

impl ContactTool {
    pub const ALL: [ContactTool; 5] = [
        ContactTool::SearchContacts,
        ContactTool::ListContacts,
        ContactTool::GetContact,
        ContactTool::CreateContact,
        ContactTool::DeleteContact,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContactTool::SearchContacts => "search_contacts",
            ContactTool::ListContacts => "list_contacts",
            ContactTool::GetContact => "get_contact",
            ContactTool::CreateContact => "create_contact",
            ContactTool::DeleteContact => "delete_contact",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            ContactTool::SearchContacts => "Search for contacts by name, email, or phone number",
            ContactTool::ListContacts => "List all contacts",
            ContactTool::GetContact => {
                "Get detailed information about a specific contact by resource name"
            }
            ContactTool::CreateContact => "Create a new contact",
            ContactTool::DeleteContact => "Delete a contact by resource name",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            ContactTool::SearchContacts => json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search term to find in contacts"
                    },
                    "max_results": {
                        "type": "number",
                        "description": "Maximum number of results to return (default: 10)",
                        "default": DEFAULT_SEARCH_MAX_RESULTS
                    }
                },
                "required": ["query"]
            }),
            ContactTool::ListContacts => json!({
                "type": "object",
                "properties": {
                    "max_results": {
                        "type": "number",
                        "description": "Maximum number of results to return (default: 100)",
                        "default": DEFAULT_LIST_MAX_RESULTS
                    }
                }
            }),
            ContactTool::GetContact => json!({
                "type": "object",
                "properties": {
                    "resource_name": {
                        "type": "string",
                        "description": "Resource name of the contact (e.g., people/c1234567890)"
                    }
                },
                "required": ["resource_name"]
            }),
            ContactTool::CreateContact => json!({
                "type": "object",
                "properties": {
                    "given_name": {"type": "string", "description": "First name"},
                    "family_name": {"type": "string", "description": "Last name"},
                    "email": {"type": "string", "description": "Email address"},
                    "phone": {"type": "string", "description": "Phone number"},
                    "organization": {"type": "string", "description": "Company/organization name"},
                    "job_title": {"type": "string", "description": "Job title"}
                },
                "required": ["given_name"]
            }),
            ContactTool::DeleteContact => json!({
                "type": "object",
                "properties": {
                    "resource_name": {
                        "type": "string",
                        "description": "Resource name of the contact to delete (e.g., people/c1234567890)"
                    }
                },
                "required": ["resource_name"]
            }),
        }
    }

    pub fn definition(self) -> Tool {
        Tool {
            name: Cow::Borrowed(self.name()),
            title: None,
            description: Some(Cow::Borrowed(self.description())),
            input_schema: Arc::new(schema_object(self.input_schema())),
            output_schema: None,
            annotations: None,
            icons: None,
        }
    }
}

fn schema_object(v: Value) -> JsonObject {
    match v {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

/// Tool descriptors in catalog order.
pub fn catalog() -> Vec<Tool> {
    ContactTool::ALL.into_iter().map(ContactTool::definition).collect()
}
