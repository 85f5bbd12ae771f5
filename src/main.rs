use std::net::SocketAddr;

use dotenvy::dotenv;

use lectern::cli::provision_root_if_missing;
use lectern::logging::init_tracing;
use lectern::router::init_router;
use lectern::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let state = init_app_state().await?;
    provision_root_if_missing(&state.db, &state.bootstrap).await?;

    let app = init_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "server listening");
    // The rate limiter keys on the peer IP, which needs connect info.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
