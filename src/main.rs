//! Point d'entrée principal de l'application.
//! Lit la configuration, ouvre la base, construit le client du modèle de
//! langage et démarre le serveur web avec Axum.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use dotenv::dotenv;
use log::info;

use clinic_api::{
    backend::router::{get_router, AppState},
    config::Config,
    database,
    llm::OpenAiClient,
    utils::token::TokenKeys,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Charger les variables d'environnement
    dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config::from_env();

    let store = database::connect(&config)
        .await
        .context("Failed to open the database")?;

    let llm = OpenAiClient::new(&config.llm_base_url, config.llm_api_key.clone())
        .context("Failed to build the language model client")?;
    if config.llm_api_key.is_none() {
        info!("OPENAI_API_KEY is not set, chat will answer with fallback messages");
    }

    let state = AppState {
        store: store.clone(),
        llm: Arc::new(llm),
        tokens: TokenKeys::new(&config.secret_key),
    };
    let app = get_router(state);

    // Démarrer le serveur web
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to open web server listener")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server stopped unexpectedly")?;

    // Fermer la connexion une fois les requêtes en cours terminées
    store.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
