//! Accès à la base documentaire (utilisateurs, patients, rendez-vous, notifications).
//!
//! Chaque opération est une lecture ou une écriture unique; aucune donnée n'est
//! mise en cache entre deux requêtes. Deux implémentations: MongoDB en
//! production, et un stockage en mémoire pour le développement et les tests.

mod memory;
mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use thiserror::Error;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::config::Config;
use crate::models::{Appointment, AppointmentStatus, Notification, Patient, PatientInput, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Failed to serialize document: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error("DB poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Les opérations dont l'API a besoin, une par accès à la base.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Vrai si le username ou l'email est déjà pris (comparaison exacte).
    async fn user_exists(&self, username: &str, email: &str) -> StoreResult<bool>;

    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    async fn insert_patient(&self, patient: &Patient) -> StoreResult<()>;

    /// Fiches du plus récent au plus ancien, filtrées par email si demandé.
    async fn list_patients(&self, email: Option<&str>) -> StoreResult<Vec<Patient>>;

    async fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>>;

    /// Remplace les champs saisis; `None` si la fiche n'existe pas.
    async fn update_patient(&self, id: &str, details: &PatientInput) -> StoreResult<Option<Patient>>;

    /// Faux si aucune fiche ne portait cet id.
    async fn delete_patient(&self, id: &str) -> StoreResult<bool>;

    async fn insert_appointment(&self, appointment: &Appointment) -> StoreResult<()>;

    /// Rendez-vous du plus récent au plus ancien, filtrés par patient si demandé.
    async fn list_appointments(&self, patient_id: Option<&str>) -> StoreResult<Vec<Appointment>>;

    /// Change le statut, les notes si fournies, et assigne le médecin.
    async fn update_appointment(
        &self,
        id: &str,
        status: AppointmentStatus,
        notes: Option<&str>,
        doctor_id: &str,
    ) -> StoreResult<Option<Appointment>>;

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()>;

    async fn list_notifications(&self, limit: usize) -> StoreResult<Vec<Notification>>;

    /// Faux si aucune notification ne portait cet id.
    async fn mark_notification_read(&self, id: &str) -> StoreResult<bool>;

    /// Libère la connexion; appelé une fois à l'arrêt du serveur.
    async fn close(&self);
}

pub type SharedStore = Arc<dyn Store>;

/// Ouvre la base configurée: MongoDB si `MONGO_URL` est défini, sinon la mémoire.
pub async fn connect(config: &Config) -> StoreResult<SharedStore> {
    match &config.mongo_url {
        Some(url) => {
            let store = MongoStore::connect(url, &config.db_name).await?;
            info!("Connected to MongoDB database {}", config.db_name);
            Ok(Arc::new(store))
        }
        None => {
            warn!("MONGO_URL is not set, data will only live in memory");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}
