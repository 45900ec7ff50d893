//! Stockage MongoDB. Les documents sont retrouvés par leur champ applicatif
//! `id`, jamais par `_id`.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, to_document, Document},
    options::ReturnDocument,
    Client, Collection, Database,
};
use serde::{de::DeserializeOwned, Serialize};

use super::{Store, StoreResult};
use crate::consts::{
    APPOINTMENTS_COLLECTION, LIST_LIMIT, NOTIFICATIONS_COLLECTION, PATIENTS_COLLECTION,
    USERS_COLLECTION,
};
use crate::models::{Appointment, AppointmentStatus, Notification, Patient, PatientInput, User};

pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Ouvre la connexion (poolée par le driver) et vérifie qu'elle répond.
    pub async fn connect(uri: &str, db_name: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }).await?;
        Ok(Self { client, db })
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS_COLLECTION)
    }

    fn patients(&self) -> Collection<Patient> {
        self.db.collection(PATIENTS_COLLECTION)
    }

    fn appointments(&self) -> Collection<Appointment> {
        self.db.collection(APPOINTMENTS_COLLECTION)
    }

    fn notifications(&self) -> Collection<Notification> {
        self.db.collection(NOTIFICATIONS_COLLECTION)
    }
}

/// `find` trié du plus récent au plus ancien.
async fn newest_first<T>(collection: Collection<T>, filter: Document, limit: usize) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned + Serialize + Send + Sync + Unpin,
{
    let cursor = collection
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .limit(limit as i64)
        .await?;
    Ok(cursor.try_collect().await?)
}

#[async_trait]
impl Store for MongoStore {
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users().find_one(doc! { "username": username }).await?)
    }

    async fn user_exists(&self, username: &str, email: &str) -> StoreResult<bool> {
        let filter = doc! { "$or": [{ "username": username }, { "email": email }] };
        Ok(self.users().find_one(filter).await?.is_some())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.users().insert_one(user).await?;
        Ok(())
    }

    async fn insert_patient(&self, patient: &Patient) -> StoreResult<()> {
        self.patients().insert_one(patient).await?;
        Ok(())
    }

    async fn list_patients(&self, email: Option<&str>) -> StoreResult<Vec<Patient>> {
        let filter = match email {
            Some(email) => doc! { "email": email },
            None => doc! {},
        };
        newest_first(self.patients(), filter, LIST_LIMIT).await
    }

    async fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        Ok(self.patients().find_one(doc! { "id": id }).await?)
    }

    async fn update_patient(&self, id: &str, details: &PatientInput) -> StoreResult<Option<Patient>> {
        let update = doc! { "$set": to_document(details)? };
        Ok(self
            .patients()
            .find_one_and_update(doc! { "id": id }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_patient(&self, id: &str) -> StoreResult<bool> {
        let result = self.patients().delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> StoreResult<()> {
        self.appointments().insert_one(appointment).await?;
        Ok(())
    }

    async fn list_appointments(&self, patient_id: Option<&str>) -> StoreResult<Vec<Appointment>> {
        let filter = match patient_id {
            Some(patient_id) => doc! { "patient_id": patient_id },
            None => doc! {},
        };
        newest_first(self.appointments(), filter, LIST_LIMIT).await
    }

    async fn update_appointment(
        &self,
        id: &str,
        status: AppointmentStatus,
        notes: Option<&str>,
        doctor_id: &str,
    ) -> StoreResult<Option<Appointment>> {
        let mut fields = doc! {
            "status": to_bson(&status)?,
            "doctor_id": doctor_id,
        };
        if let Some(notes) = notes {
            fields.insert("notes", notes);
        }

        Ok(self
            .appointments()
            .find_one_and_update(doc! { "id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        self.notifications().insert_one(notification).await?;
        Ok(())
    }

    async fn list_notifications(&self, limit: usize) -> StoreResult<Vec<Notification>> {
        newest_first(self.notifications(), doc! {}, limit).await
    }

    async fn mark_notification_read(&self, id: &str) -> StoreResult<bool> {
        let result = self
            .notifications()
            .update_one(doc! { "id": id }, doc! { "$set": { "read": true } })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
