use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use notes_api::{
    AppState,
    app::router::build_router,
    config::{AppConfig, StoreBackend},
    store::{MemoryStore, PgNoteStore, PgUserStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notes_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let state = match config.store {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let db = PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(&database_url)
                .await
                .context("failed to connect to Postgres")?;

            sqlx::migrate!()
                .run(&db)
                .await
                .context("failed to run migrations")?;

            tracing::info!(max_connections, "using postgres store");
            AppState::new(
                Arc::new(PgNoteStore::new(db.clone())),
                Arc::new(PgUserStore::new(db)),
            )
        }
        StoreBackend::Memory { seed_users } => {
            tracing::warn!("using in-memory store, data is lost on exit");
            let store = MemoryStore::new();
            for username in seed_users {
                let user = store.insert_user(username);
                tracing::info!(user_id = %user.id, username = %user.username, "seeded user");
            }
            AppState::new(Arc::new(store.clone()), Arc::new(store))
        }
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
