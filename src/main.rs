#![deny(warnings)]
#![deny(clippy::unwrap_used)]

use std::sync::Arc;

use dotenv::dotenv;
use poem::{EndpointExt, Route, Server, listener::TcpListener, middleware::Tracing};
use poem_mcpserver::{McpServer, streamable_http};
use rtmp_playback_auth::auth::config::{resolve_app_names, resolve_vhost_home};
use rtmp_playback_auth::auth::{AuthPolicy, AuthRegistry, McpAuthCommands};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Initialize logging with proper tracing default
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().expect("valid directive")),
        )
        .init();

    let vhost_home = resolve_vhost_home(None);
    info!("Using vhost home {}", vhost_home.display());

    let registry = Arc::new(AuthRegistry::new(vhost_home, AuthPolicy::from_env()));
    for app in resolve_app_names(None) {
        registry.start_app(&app);
    }

    // Setup MCP server
    let mcp_port: u16 = std::env::var("MCP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let mcp_addr = format!("0.0.0.0:{}", mcp_port);
    info!("Starting MCP admin server on {}", mcp_addr);

    let app = Route::new()
        .at(
            "/",
            streamable_http::endpoint(move |_| {
                McpServer::new().tools(McpAuthCommands::new(registry.clone()))
            }),
        )
        .with(Tracing);

    info!("Applications: {:?}", resolve_app_names(None));
    info!("Use auth_stats or auth_force_reload to inspect and refresh credentials");

    Server::new(TcpListener::bind(mcp_addr))
        .name("RTMP Auth Admin Server")
        .run(app)
        .await?;

    Ok(())
}
