//! Constantes globales de l'application.

pub const HTTP_PORT: u16 = 8080; // Port par défaut pour le serveur HTTP.
pub const DEFAULT_DB_NAME: &str = "dental_ai"; // Base utilisée si DB_NAME est absent.
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-change-this";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Durée de validité d'un jeton d'accès.
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

// Collections de la base documentaire
pub const USERS_COLLECTION: &str = "users";
pub const PATIENTS_COLLECTION: &str = "patients";
pub const APPOINTMENTS_COLLECTION: &str = "appointments";
pub const NOTIFICATIONS_COLLECTION: &str = "notifications";

/// Nombre maximal de documents renvoyés par une liste.
pub const LIST_LIMIT: usize = 1000;
/// Le fil de notifications ne montre que les plus récentes.
pub const NOTIFICATION_FEED_LIMIT: usize = 50;

// Paramètres de l'appel au modèle de langage
pub const LLM_MODEL: &str = "gpt-3.5-turbo";
pub const LLM_MAX_TOKENS: u32 = 500;
pub const LLM_TEMPERATURE: f32 = 0.7;
pub const LLM_TIMEOUT_SECS: u64 = 30;
