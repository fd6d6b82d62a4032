mod api;
mod app;
mod config;
mod conjugation;
mod data;
mod db;
mod deck;
mod feedback;
mod models;
mod selector;
mod session;
mod srs;
mod timer;

use anyhow::Context;
use app::App;
use config::Config;
use db::Db;
use std::sync::Arc;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let db = Db::new(&config.database_url)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;
    let store = match db.load_progress().await {
        Some(store) => {
            log::info!("loaded progress for {} cards", store.cards.len());
            store
        }
        None => {
            log::info!("no stored progress, starting fresh");
            Default::default()
        }
    };

    let app = App::new(store, Box::new(db.spawn_writer()), config.app_options());
    let state = api::ApiState {
        app: Arc::new(Mutex::new(app)),
    };
    let router = api::app_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    log::info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, router).await?;
    Ok(())
}
