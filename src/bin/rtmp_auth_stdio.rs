#![deny(warnings)]
#![deny(clippy::unwrap_used)]

use std::sync::Arc;

use dotenv::dotenv;
use poem_mcpserver::McpServer;
use rtmp_playback_auth::auth::config::{resolve_app_names, resolve_vhost_home};
use rtmp_playback_auth::auth::{AuthPolicy, AuthRegistry, McpAuthCommands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // stdout carries the protocol, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().expect("valid directive")),
        )
        .init();

    let registry = Arc::new(AuthRegistry::new(
        resolve_vhost_home(None),
        AuthPolicy::from_env(),
    ));
    for app in resolve_app_names(None) {
        registry.start_app(&app);
    }

    poem_mcpserver::stdio::stdio(McpServer::new().tools(McpAuthCommands::new(registry))).await?;
    Ok(())
}
