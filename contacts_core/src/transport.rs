use serde_json::Value;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp_server::JsonRpcHandler;

/// Newline-delimited JSON-RPC over stdio. Stdout carries protocol frames only.
pub struct StdioTransport {
    handler: JsonRpcHandler,
}

impl StdioTransport {
    pub fn new(handler: JsonRpcHandler) -> Self {
        Self { handler }
    }

    /// Run the stdio transport, reading from stdin and writing to stdout until EOF
    pub async fn run(&self) -> io::Result<()> {
        info!("Starting stdio transport");
        let reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        self.serve(reader, &mut stdout).await
    }

    /// Serve requests from any line source; one response line per request.
    pub async fn serve<R, W>(&self, mut reader: R, writer: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                debug!("EOF reached on input");
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.process_line(&line).await {
                write_response(writer, &response).await?;
            }
        }
    }

    /// Process a single line of input
    async fn process_line(&self, line: &str) -> Option<Value> {
        debug!("Processing line: {}", line.trim_end());

        match serde_json::from_str::<Value>(line) {
            Ok(request) => self.handler.handle_request(request).await,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                Some(serde_json::json!({
                    "jsonrpc": "2.0",
                    "error": {
                        "code": -32700,
                        "message": "Parse error",
                        "data": e.to_string()
                    },
                    "id": null
                }))
            }
        }
    }
}

async fn write_response<W>(writer: &mut W, response: &Value) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let response_str = serde_json::to_string(response)?;

    writer.write_all(response_str.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    debug!("Sent response: {}", response_str);

    Ok(())
}
