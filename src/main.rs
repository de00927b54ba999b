use std::sync::Arc;

use photobook::config::Config;
use photobook::repo::Repository;
use photobook::repo::memory::MemoryRepository;
use photobook::repo::postgres::PgRepository;
use photobook::{db, routes, services, state};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().expect("invalid configuration");

    // Without a database the service runs on an in-memory store (development only).
    let repo: Arc<dyn Repository> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections)
                .await
                .expect("database init failed");
            Arc::new(PgRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory repository, data will not survive restart");
            Arc::new(MemoryRepository::new())
        }
    };

    if config.seed_system_layouts {
        let seeded = services::layout::seed_system_layouts(repo.as_ref())
            .await
            .expect("seeding system layouts failed");
        tracing::info!(seeded, "system layouts checked");
    }

    let state = state::AppState::new(repo);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("failed to bind");

    let port = config.port;
    tracing::info!(%port, "photobook listening");
    axum::serve(listener, app).await.expect("server failed");
}
