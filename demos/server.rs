//! Example server: loads model configs from MODELS_PATH, picks Postgres when DATABASE_URL is set
//! (in-memory otherwise), mounts common routes and the generated model routes under /api/v1.

use docroutes::{
    common_routes_with_ready,
    ensure_database_exists,
    load_models_from_path,
    logging,
    model_routes,
    resolve,
    AppState,
    DocumentStore,
    MemoryStore,
    PgDocumentStore,
    Settings,
};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init(logging::DEFAULT_DIRECTIVE)?;
    let settings = Settings::from_env()?;

    let configs = load_models_from_path(&settings.models_path).await?;
    let models = resolve(&configs)?;
    tracing::info!(models = ?models.names().collect::<Vec<_>>(), "models resolved");

    let store: Arc<dyn DocumentStore> = match &settings.database_url {
        Some(url) => {
            ensure_database_exists(url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            let store = PgDocumentStore::new(pool, settings.store_schema.clone());
            store.ensure_collections(&models.models).await?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState {
        store: Arc::clone(&store),
        models: Arc::new(models),
    };

    let app = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api/v1", model_routes(&state.models.models, store))
        .layer(RequestBodyLimitLayer::new(settings.body_limit_bytes));

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
