mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod routes;
mod titles;
mod users;

use std::sync::Arc;

use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::MovieCatalog, config::Config, users::UserDirectory};

pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: MovieCatalog,
    pub users: UserDirectory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviebot=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(&config.database_url).await?;
    let state = Arc::new(AppState {
        config: config.clone(),
        catalog: MovieCatalog::new(db.clone()),
        users: UserDirectory::new(db),
    });

    let status = state.catalog.status().await?;
    tracing::info!(total_movies = status.total_movies, "catalog loaded");

    let app = routes::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
