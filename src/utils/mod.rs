//! Utilitaires partagés: erreurs, mots de passe, jetons et validation des entrées.

pub mod error_messages;
pub mod password_utils;
pub mod token;
pub mod validation;
