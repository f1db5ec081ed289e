//! slack-mcp: MCP server for the Slack Web API over stdio.

use slack_mcp::tools::all_tools;
use slack_mcp::{McpServer, SlackClient, SlackConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Stdout carries the protocol, so logs go to stderr (filter via SLACK_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SLACK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SlackConfig::from_env();
    config.validate()?;

    let client = Arc::new(SlackClient::from_config(&config)?);
    info!(
        api_base = %config.api_base,
        kind = %client.credential_kind(),
        "Slack client ready"
    );

    let server = McpServer::slack();
    server.register_tools(all_tools(&client)).await;
    info!(tools = server.list_tools().await.len(), "Serving MCP over stdio");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    slack_mcp::stdio::serve(&server, stdin, tokio::io::stdout()).await?;

    Ok(())
}
