use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use contacts_core::{
    build_people_client, ContactsConfig, JsonRpcHandler, McpServer, PeopleApi, StdioTransport,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout belongs to the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = ContactsConfig::from_env().and_then(|config| build_people_client(&config));
    let people: Arc<dyn PeopleApi> = match client {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("FATAL: Failed to initialize Google Contacts: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Google Contacts MCP server initialized");

    let server = McpServer::new(people);
    let handler = JsonRpcHandler::new(server);
    let transport = StdioTransport::new(handler);

    info!("Google Contacts MCP server running on stdio");

    if let Err(e) = transport.run().await {
        error!("Fatal error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
