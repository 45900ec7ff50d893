//! API d'un cabinet dentaire: comptes patients et médecins, registre des
//! patients, rendez-vous avec notifications, et assistant conversationnel.

pub mod backend;
pub mod chat;
pub mod config;
pub mod consts;
pub mod database;
pub mod llm;
pub mod models;
pub mod utils;
