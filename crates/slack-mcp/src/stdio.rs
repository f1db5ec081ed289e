//! Newline-delimited JSON-RPC over a byte stream.
//!
//! One request per line in, one response per line out. Notifications are
//! handled but never answered. The stream ends the session at EOF.

use crate::server::McpServer;
use crate::types::{McpError, McpRequest, McpResponse, RequestId};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Handle one line of input.
///
/// Returns the response to write back, or `None` for blank lines and
/// notifications.
pub async fn handle_line(server: &McpServer, line: &str) -> Option<McpResponse> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse request: {}", e);
            return Some(McpResponse::error(
                RequestId::Null,
                McpError::parse_error().with_data(Value::String(e.to_string())),
            ));
        }
    };

    let id: RequestId = value
        .get("id")
        .cloned()
        .and_then(|id| serde_json::from_value(id).ok())
        .unwrap_or_default();
    let request: McpRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            warn!("Malformed request: {}", e);
            return Some(McpResponse::error(id, McpError::invalid_request()));
        }
    };

    if request.is_notification() {
        debug!(method = %request.method, "Received notification");
        return None;
    }

    Some(server.handle_request(request).await)
}

/// Serve requests from `reader` until EOF, writing responses to `writer`.
pub async fn serve<R, W>(server: &McpServer, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let Some(response) = handle_line(server, &line).await else {
            continue;
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    debug!("Input closed");
    Ok(())
}
