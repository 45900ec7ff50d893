//! Stockage en mémoire, sans persistance.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Store, StoreError, StoreResult};
use crate::consts::LIST_LIMIT;
use crate::models::{Appointment, AppointmentStatus, Notification, Patient, PatientInput, User};

#[derive(Default)]
struct Db {
    users: Vec<User>,
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
    notifications: Vec<Notification>,
}

#[derive(Default)]
pub struct MemoryStore {
    db: RwLock<Db>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Db) -> T) -> StoreResult<T> {
        let db = self.db.read().or(Err(StoreError::Poisoned))?;
        Ok(f(&db))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Db) -> T) -> StoreResult<T> {
        let mut db = self.db.write().or(Err(StoreError::Poisoned))?;
        Ok(f(&mut db))
    }
}

/// Trie du plus récent au plus ancien. À date égale, le dernier inséré passe
/// en premier.
fn newest_first<'a, T, I>(items: I, created_at: fn(&T) -> DateTime<Utc>, limit: usize) -> Vec<T>
where
    T: Clone + 'a,
    I: DoubleEndedIterator<Item = &'a T>,
{
    let mut sorted: Vec<T> = items.rev().cloned().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    sorted.truncate(limit);
    sorted
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.read(|db| db.users.iter().find(|u| u.username == username).cloned())
    }

    async fn user_exists(&self, username: &str, email: &str) -> StoreResult<bool> {
        self.read(|db| db.users.iter().any(|u| u.username == username || u.email == email))
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.write(|db| db.users.push(user.clone()))
    }

    async fn insert_patient(&self, patient: &Patient) -> StoreResult<()> {
        self.write(|db| db.patients.push(patient.clone()))
    }

    async fn list_patients(&self, email: Option<&str>) -> StoreResult<Vec<Patient>> {
        self.read(|db| {
            let matching = db
                .patients
                .iter()
                .filter(|p| email.map_or(true, |e| p.details.email == e));
            newest_first(matching, |p| p.created_at, LIST_LIMIT)
        })
    }

    async fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        self.read(|db| db.patients.iter().find(|p| p.id == id).cloned())
    }

    async fn update_patient(&self, id: &str, details: &PatientInput) -> StoreResult<Option<Patient>> {
        self.write(|db| {
            let patient = db.patients.iter_mut().find(|p| p.id == id)?;
            patient.details = details.clone();
            Some(patient.clone())
        })
    }

    async fn delete_patient(&self, id: &str) -> StoreResult<bool> {
        self.write(|db| {
            let before = db.patients.len();
            db.patients.retain(|p| p.id != id);
            db.patients.len() != before
        })
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> StoreResult<()> {
        self.write(|db| db.appointments.push(appointment.clone()))
    }

    async fn list_appointments(&self, patient_id: Option<&str>) -> StoreResult<Vec<Appointment>> {
        self.read(|db| {
            let matching = db
                .appointments
                .iter()
                .filter(|a| patient_id.map_or(true, |id| a.patient_id == id));
            newest_first(matching, |a| a.created_at, LIST_LIMIT)
        })
    }

    async fn update_appointment(
        &self,
        id: &str,
        status: AppointmentStatus,
        notes: Option<&str>,
        doctor_id: &str,
    ) -> StoreResult<Option<Appointment>> {
        self.write(|db| {
            let appointment = db.appointments.iter_mut().find(|a| a.id == id)?;
            appointment.status = status;
            if let Some(notes) = notes {
                appointment.notes = notes.to_string();
            }
            appointment.doctor_id = Some(doctor_id.to_string());
            Some(appointment.clone())
        })
    }

    async fn insert_notification(&self, notification: &Notification) -> StoreResult<()> {
        self.write(|db| db.notifications.push(notification.clone()))
    }

    async fn list_notifications(&self, limit: usize) -> StoreResult<Vec<Notification>> {
        self.read(|db| newest_first(db.notifications.iter(), |n| n.created_at, limit))
    }

    async fn mark_notification_read(&self, id: &str) -> StoreResult<bool> {
        self.write(|db| match db.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        })
    }

    async fn close(&self) {}
}
