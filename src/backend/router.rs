//! Configuration des routes de l'API.
//! Les dépendances (base, modèle de langage, clés de jetons) sont injectées
//! une fois via `Extension` et relues par les handlers et l'extracteur.

use std::sync::Arc;

use axum::routing::{get, post, put, MethodRouter};
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;

use crate::backend::handlers_appointments::{create_appointment, list_appointments, update_appointment};
use crate::backend::handlers_chat::chat;
use crate::backend::handlers_notifications::{list_notifications, mark_notification_read};
use crate::backend::handlers_patients::{
    create_patient, delete_patient, get_patient, list_patients, update_patient,
};
use crate::backend::handlers_unauth::{health, index, login, register};
use crate::database::SharedStore;
use crate::llm::LanguageModel;
use crate::utils::token::TokenKeys;

/// Dépendances partagées par toutes les requêtes
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub llm: Arc<dyn LanguageModel>,
    pub tokens: TokenKeys,
}

/// Initialisation du routeur principal
pub fn get_router(state: AppState) -> Router {
    let routes = [
        ("/api/health", get(health)),
        ("/api/register", post(register)),
        ("/api/login", post(login)),
        ("/api/patients", get(list_patients).post(create_patient)),
        ("/api/patients/:id", get(get_patient).put(update_patient).delete(delete_patient)),
        ("/api/appointments", get(list_appointments).post(create_appointment)),
        ("/api/appointments/:id", put(update_appointment)),
        ("/api/notifications", get(list_notifications)),
        ("/api/notifications/:id/read", put(mark_notification_read)),
        ("/api/chat", post(chat)),
    ];

    routes
        .into_iter()
        .fold(Router::new().route("/", get(index)), |router, (path, handler)| {
            with_trailing_slash(router, path, handler)
        })
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
}

// Chaque route répond avec ou sans `/` final.
fn with_trailing_slash(router: Router, path: &str, handler: MethodRouter) -> Router {
    router
        .route(path, handler.clone())
        .route(&format!("{path}/"), handler)
}
