// src/error.rs
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ContactsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Method not found")]
    MethodNotFound,

    #[error("Parse error")]
    ParseError,

    #[error("{0}")]
    ToolExecution(String),
}

impl ContactsError {
    /// Wraps a failure raised while running a tool handler.
    pub fn tool_execution(err: &ContactsError) -> Self {
        ContactsError::ToolExecution(format!("Tool execution failed: {}", err))
    }

    pub fn code_str(&self) -> &'static str {
        match self {
            ContactsError::Io(_) => "io_error",
            ContactsError::SerdeJson(_) => "malformed_response",
            ContactsError::HttpRequest(_) => "upstream_error",
            ContactsError::Authentication(_) => "auth_failed",
            ContactsError::Config(_) => "config_error",
            ContactsError::InvalidParams(_) => "invalid_params",
            ContactsError::NotFound(_) => "not_found",
            ContactsError::Remote { .. } => "upstream_error",
            ContactsError::UnknownTool(_) => "tool_not_found",
            ContactsError::MethodNotFound => "method_not_found",
            ContactsError::ParseError => "parse_error",
            ContactsError::ToolExecution(_) => "internal_error",
        }
    }

    pub fn to_jsonrpc_error(&self) -> serde_json::Value {
        let (code, message) = match self {
            ContactsError::UnknownTool(_) => (-32601, self.to_string()),
            ContactsError::MethodNotFound => (-32601, "Method not found".to_string()),
            ContactsError::InvalidParams(msg) => (-32602, msg.to_string()),
            ContactsError::ParseError => (-32700, "Parse error".to_string()),
            ContactsError::ToolExecution(msg) => (-32603, msg.to_string()),
            err => (-32603, err.to_string()),
        };

        json!({
            "code": code,
            "message": message,
        })
    }
}
