use std::sync::Arc;

use memento::api::ApiState;
use memento::github::{GitHubClient, RepoLister};
use memento::session::Session;

use crate::ServeArgs;
use crate::config::Config;

/// Run the dashboard HTTP API until Ctrl+C.
pub(crate) async fn handle_serve(
    args: ServeArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = config.github_token();

    let lister: Option<Arc<dyn RepoLister>> = match &token {
        Some(token) => Some(Arc::new(GitHubClient::new(token)?)),
        None => {
            tracing::warn!(
                "no GitHub token configured; API requests will be rejected with 401. \
                 Run 'memento login' or set MEMENTO_GITHUB_TOKEN."
            );
            None
        }
    };

    let state = ApiState::new(Session::from_token(token), lister);
    let app = memento::api::router(state);

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let port = args.port.unwrap_or(config.server.port);

    let listener = tokio::net::TcpListener::bind((bind.as_str(), port)).await?;
    tracing::info!("dashboard API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown requested");
}
