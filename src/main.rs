use sea_orm::Database;
use tracing::info;

use circulation::config::CirculationConfig;
use circulation::router::build_router;
use circulation::state::AppState;
use circulation::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = CirculationConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState { db };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.circulation_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("circulation service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
