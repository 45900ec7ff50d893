//! Modèle de données
//!
//! Chaque document porte un identifiant applicatif `id` (UUID v4 en texte),
//! distinct de l'identifiant natif de la base documentaire.

use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

use crate::utils::password_utils::PWHash;

/// Role d'un utilisateur: Patient ou Médecin
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

/// État d'un rendez-vous
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Génère un nouvel identifiant applicatif.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Horodatage courant, tronqué à la microseconde comme dans la base.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Sérialisation RFC 3339 à précision fixe: l'ordre lexicographique des
/// chaînes stockées suit l'ordre chronologique.
///
/// À la lecture, un `DateTime` BSON natif est aussi accepté (documents écrits
/// par d'autres clients de la même base).
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use mongodb::bson::Bson;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Bson::deserialize(deserializer)? {
            Bson::String(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(de::Error::custom),
            Bson::DateTime(dt) => DateTime::from_timestamp_millis(dt.timestamp_millis())
                .ok_or_else(|| de::Error::custom("timestamp out of range")),
            other => Err(de::Error::custom(format!("unsupported timestamp {other}"))),
        }
    }
}

/// Un compte utilisateur tel que stocké dans la collection `users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub full_name: String,
    pub hashed_password: PWHash,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Identifiant natif attribué par MongoDB, jamais écrit par l'application.
    #[serde(rename = "_id", default, skip_serializing)]
    pub native_id: Option<ObjectId>,
}

impl User {
    pub fn new(
        username: String,
        email: String,
        role: Role,
        full_name: String,
        hashed_password: PWHash,
    ) -> Self {
        Self {
            id: new_id(),
            username,
            email,
            role,
            full_name,
            hashed_password,
            created_at: now(),
            native_id: None,
        }
    }

    /// Identifiant exposé au client: l'id applicatif, ou l'id natif à défaut.
    pub fn account_id(&self) -> String {
        if !self.id.is_empty() {
            return self.id.clone();
        }
        self.native_id.map(|oid| oid.to_hex()).unwrap_or_default()
    }

    /// Nom affiché sur les rendez-vous: nom complet, sinon le username.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

/// Champs d'une fiche patient fournis par le médecin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    #[serde(default)]
    pub medical_notes: String,
    #[serde(default)]
    pub last_visit: String,
}

/// Une fiche patient. Le lien avec un compte patient se fait par l'email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    #[serde(flatten)]
    pub details: PatientInput,
    pub created_by: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn new(details: PatientInput, created_by: &str) -> Self {
        Self {
            id: new_id(),
            details,
            created_by: created_by.to_string(),
            created_at: now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentInput {
    pub appointment_date: String,
    pub appointment_time: String,
    pub reason: String,
    #[serde(default)]
    pub notes: String,
}

/// Un rendez-vous. Les champs `patient_*` sont figés à la création.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub reason: String,
    #[serde(default)]
    pub notes: String,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_email: String,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(input: AppointmentInput, patient: &User) -> Self {
        Self {
            id: new_id(),
            appointment_date: input.appointment_date,
            appointment_time: input.appointment_time,
            reason: input.reason,
            notes: input.notes,
            patient_id: patient.account_id(),
            patient_name: patient.display_name().to_string(),
            patient_email: patient.email.clone(),
            doctor_id: None,
            status: AppointmentStatus::Pending,
            created_at: now(),
        }
    }
}

/// Corps d'une mise à jour de rendez-vous par un médecin.
///
/// `doctor_id` est accepté pour compatibilité mais toujours remplacé par
/// l'identifiant du médecin appelant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    pub status: AppointmentStatus,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub const NEW_APPOINTMENT_NOTIFICATION: &str = "new_appointment";

/// Une alerte destinée aux médecins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub appointment_id: String,
    pub patient_name: String,
    pub appointment_date: String,
    pub appointment_time: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn for_appointment(appointment: &Appointment) -> Self {
        Self {
            id: new_id(),
            kind: NEW_APPOINTMENT_NOTIFICATION.to_string(),
            message: format!("New appointment from {}", appointment.patient_name),
            appointment_id: appointment.id.clone(),
            patient_name: appointment.patient_name.clone(),
            appointment_date: appointment.appointment_date.clone(),
            appointment_time: appointment.appointment_time.clone(),
            created_at: appointment.created_at,
            read: false,
        }
    }
}

// --- Corps des requêtes et réponses de l'API ---

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub full_name: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_role: Role,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    #[serde(default)]
    pub patient_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password_utils::hash;

    fn test_user(full_name: &str) -> User {
        User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            Role::Patient,
            full_name.to_string(),
            hash("password").unwrap(),
        )
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_value(Role::Doctor).unwrap(), "doctor");
        assert_eq!(Role::Patient.to_string(), "patient");
        let role: Role = serde_json::from_str("\"patient\"").unwrap();
        assert_eq!(role, Role::Patient);
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(test_user("").display_name(), "alice");
        assert_eq!(test_user("Alice Martin").display_name(), "Alice Martin");
    }

    #[test]
    fn test_account_id_falls_back_to_native_id() {
        let mut user = test_user("");
        assert_eq!(user.account_id(), user.id);

        let oid = ObjectId::new();
        user.id.clear();
        user.native_id = Some(oid);
        assert_eq!(user.account_id(), oid.to_hex());
    }

    #[test]
    fn test_appointment_snapshots_patient() {
        let user = test_user("Alice Martin");
        let appointment = Appointment::new(
            AppointmentInput {
                appointment_date: "2025-03-01".to_string(),
                appointment_time: "10:00".to_string(),
                reason: "Checkup".to_string(),
                notes: String::new(),
            },
            &user,
        );

        assert_eq!(appointment.patient_id, user.id);
        assert_eq!(appointment.patient_name, "Alice Martin");
        assert_eq!(appointment.patient_email, "alice@example.com");
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.doctor_id, None);

        let notification = Notification::for_appointment(&appointment);
        assert_eq!(notification.appointment_id, appointment.id);
        assert_ne!(notification.id, appointment.id);
        assert_eq!(notification.kind, "new_appointment");
        assert_eq!(notification.message, "New appointment from Alice Martin");
        assert_eq!(notification.created_at, appointment.created_at);
        assert!(!notification.read);
    }

    #[test]
    fn test_timestamps_sort_lexicographically() {
        let earlier = DateTime::parse_from_rfc3339("2025-01-01T09:59:59.9Z").unwrap().with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2025-01-01T10:00:00Z").unwrap().with_timezone(&Utc);

        let encode = |dt: DateTime<Utc>| {
            let patient = Patient {
                id: "p".to_string(),
                details: PatientInput {
                    name: "n".to_string(),
                    email: "e@x.com".to_string(),
                    phone: "1".to_string(),
                    date_of_birth: "2000-01-01".to_string(),
                    medical_notes: String::new(),
                    last_visit: String::new(),
                },
                created_by: "d".to_string(),
                created_at: dt,
            };
            serde_json::to_value(patient).unwrap()["created_at"]
                .as_str()
                .unwrap()
                .to_string()
        };

        assert_eq!(encode(later), "2025-01-01T10:00:00.000000Z");
        assert!(encode(earlier) < encode(later));
    }

    #[test]
    fn test_created_at_accepts_native_bson_datetime() {
        use mongodb::bson::{doc, from_document, DateTime as BsonDateTime};

        let document = doc! {
            "id": "n-1",
            "type": "new_appointment",
            "message": "New appointment from Alice",
            "appointment_id": "a-1",
            "patient_name": "Alice",
            "appointment_date": "2025-03-01",
            "appointment_time": "09:00",
            "created_at": BsonDateTime::from_millis(1_735_725_600_000),
            "read": false,
        };
        let notification: Notification = from_document(document).unwrap();
        assert_eq!(notification.created_at.to_rfc3339(), "2025-01-01T10:00:00+00:00");

        let document = doc! {
            "id": "n-2",
            "type": "new_appointment",
            "message": "m",
            "appointment_id": "a-2",
            "patient_name": "Alice",
            "appointment_date": "2025-03-01",
            "appointment_time": "09:00",
            "created_at": "2025-01-01T10:00:00.000000Z",
        };
        let notification: Notification = from_document(document).unwrap();
        assert_eq!(notification.created_at.timestamp_millis(), 1_735_725_600_000);

        let bad: Result<Notification, _> = from_document(doc! {
            "id": "n-3",
            "type": "new_appointment",
            "message": "m",
            "appointment_id": "a-3",
            "patient_name": "Alice",
            "appointment_date": "2025-03-01",
            "appointment_time": "09:00",
            "created_at": 42,
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_patient_flattens_details() {
        let patient = Patient::new(
            PatientInput {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                phone: "555".to_string(),
                date_of_birth: "1990-05-05".to_string(),
                medical_notes: String::new(),
                last_visit: String::new(),
            },
            "doctor-1",
        );
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["email"], "bob@example.com");
        assert_eq!(json["created_by"], "doctor-1");

        let back: Patient = serde_json::from_value(json).unwrap();
        assert_eq!(back, patient);
    }
}
