//! Relais vers le modèle de langage: construction du prompt selon le rôle,
//! contexte patient optionnel, et réponse de repli en cas d'échec.

use log::error;

use crate::llm::LanguageModel;
use crate::models::{Patient, Role};

/// Bloc de contexte inséré dans le prompt système quand un patient est désigné.
pub fn patient_context(patient: &Patient) -> String {
    let details = &patient.details;
    let or_default = |value: &str, default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };

    format!(
        "Patient Context:\n\
         - Name: {}\n\
         - DOB: {}\n\
         - Medical Notes: {}\n\
         - Last Visit: {}\n",
        details.name,
        details.date_of_birth,
        or_default(&details.medical_notes, "None"),
        or_default(&details.last_visit, "Not recorded"),
    )
}

pub fn system_prompt(role: Role, patient: Option<&Patient>) -> String {
    let context = patient.map(patient_context).unwrap_or_default();

    match role {
        Role::Doctor => format!(
            "You are an AI dental assistant for healthcare professionals. Provide clinical \
             insights, treatment recommendations, and professional guidance.\n\n\
             {context}\n\
             - If you have patient context, reference it specifically.\n"
        ),
        Role::Patient => format!(
            "You are an AI dental assistant for patients. Provide empathetic, educational \
             dental health tips (no diagnosis).\n\n\
             {context}\n\
             - Always recommend consulting a dentist for medical concerns.\n"
        ),
    }
}

/// Réponse déterministe renvoyée quand le modèle est injoignable.
pub fn fallback_response(role: Role, message: &str) -> String {
    match role {
        Role::Doctor => format!(
            "I understand you asked: '{message}'. As a clinical assistant, I suggest reviewing \
             guidelines. How else can I assist?"
        ),
        Role::Patient => format!(
            "I understand you asked: '{message}'. For dental advice, consult your dentist. \
             Meanwhile, here's a general tip: brush twice a day and floss daily."
        ),
    }
}

/// Interroge le modèle. Aucune erreur ne remonte à l'appelant: tout échec est
/// journalisé puis remplacé par la réponse de repli.
pub async fn relay(
    model: &dyn LanguageModel,
    role: Role,
    patient: Option<&Patient>,
    message: &str,
) -> String {
    let prompt = system_prompt(role, patient);

    match model.complete(&prompt, message).await {
        Ok(text) => text,
        Err(e) => {
            error!("Language model call failed: {e}");
            fallback_response(role, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::models::PatientInput;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the prompts it receives and answers from a script.
    struct Scripted {
        answer: Option<String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl LanguageModel for Scripted {
        async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_message.to_string()));
            self.answer
                .clone()
                .ok_or_else(|| LlmError::Malformed("scripted failure".into()))
        }
    }

    fn patient(notes: &str) -> Patient {
        Patient::new(
            PatientInput {
                name: "Bob Stone".to_string(),
                email: "bob@example.com".to_string(),
                phone: "555".to_string(),
                date_of_birth: "1980-02-03".to_string(),
                medical_notes: notes.to_string(),
                last_visit: String::new(),
            },
            "doc",
        )
    }

    #[test]
    fn test_prompt_differs_by_role() {
        let doctor = system_prompt(Role::Doctor, None);
        let patient = system_prompt(Role::Patient, None);

        assert!(doctor.contains("healthcare professionals"));
        assert!(!doctor.contains("no diagnosis"));
        assert!(patient.contains("no diagnosis"));
        assert!(patient.contains("Always recommend consulting a dentist"));
        assert!(!patient.contains("Patient Context"));
    }

    #[test]
    fn test_patient_context_is_inlined() {
        let prompt = system_prompt(Role::Doctor, Some(&patient("Bruxism")));
        assert!(prompt.contains("- Name: Bob Stone"));
        assert!(prompt.contains("- DOB: 1980-02-03"));
        assert!(prompt.contains("- Medical Notes: Bruxism"));
        assert!(prompt.contains("- Last Visit: Not recorded"));

        let prompt = system_prompt(Role::Patient, Some(&patient("")));
        assert!(prompt.contains("- Medical Notes: None"));
    }

    #[tokio::test]
    async fn test_relay_returns_model_answer() {
        let model = Scripted {
            answer: Some("Use a soft brush.".to_string()),
            seen: Mutex::new(Vec::new()),
        };
        let answer = relay(&model, Role::Patient, None, "My gums bleed").await;
        assert_eq!(answer, "Use a soft brush.");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, "My gums bleed");
        assert!(seen[0].0.contains("for patients"));
    }

    #[tokio::test]
    async fn test_relay_falls_back_on_failure() {
        let model = Scripted {
            answer: None,
            seen: Mutex::new(Vec::new()),
        };
        let answer = relay(&model, Role::Doctor, None, "Dosage for amoxicillin?").await;
        assert_eq!(answer, fallback_response(Role::Doctor, "Dosage for amoxicillin?"));
        assert!(answer.contains("'Dosage for amoxicillin?'"));
    }
}
