//! Configuration lue depuis l'environnement (et un éventuel fichier `.env`).

use std::env;

use log::warn;

use crate::consts;

#[derive(Debug, Clone)]
pub struct Config {
    /// Chaîne de connexion MongoDB. Sans elle, le stockage reste en mémoire.
    pub mongo_url: Option<String>,
    pub db_name: String,
    pub secret_key: String,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub http_port: u16,
}

impl Config {
    /// Lit la configuration. `dotenv()` doit avoir été appelé avant.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret_key = non_empty("SECRET_KEY").unwrap_or_else(|| {
            warn!("SECRET_KEY is not set, falling back to the development secret");
            consts::DEFAULT_SECRET_KEY.to_string()
        });

        let http_port = match non_empty("HTTP_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid HTTP_PORT {raw:?}, using {}", consts::HTTP_PORT);
                consts::HTTP_PORT
            }),
            None => consts::HTTP_PORT,
        };

        Self {
            mongo_url: non_empty("MONGO_URL"),
            db_name: non_empty("DB_NAME").unwrap_or_else(|| consts::DEFAULT_DB_NAME.to_string()),
            secret_key,
            llm_api_key: non_empty("OPENAI_API_KEY"),
            llm_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| consts::DEFAULT_LLM_BASE_URL.to_string()),
            http_port,
        }
    }
}
