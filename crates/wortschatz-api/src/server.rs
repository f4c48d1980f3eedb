//! Server bootstrap.

use crate::routes::{router, AppState};
use std::sync::Arc;
use wortschatz_core::Result;

/// Bind and serve the API until the task is cancelled.
pub async fn serve(host: &str, port: u16, state: Arc<AppState>) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
