//! Module principal pour l'API HTTP.
//! Contient le routeur, l'extracteur d'authentification et les handlers
//! regroupés par ressource.
pub mod handlers_appointments;
pub mod handlers_chat;
pub mod handlers_notifications;
pub mod handlers_patients;
pub mod handlers_unauth;
pub mod middlewares;
pub mod router;
