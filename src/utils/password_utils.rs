//! Hachage et vérification des mots de passe

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHashString, PasswordVerifier, SaltString},
    Argon2, PasswordHasher,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

static DEFAULT_HASHER: Lazy<Argon2<'static>> = Lazy::new(Argon2::default);

/// Le hash d'un mot de passe vide, à utiliser quand l'utilisateur n'existe pas
/// pour éviter une attaque par canal auxiliaire
static EMPTY_HASH: Lazy<Option<PWHash>> = Lazy::new(|| hash("").ok());

/// Un mot de passe haché (chaîne PHC)
#[derive(Clone, Debug)]
pub struct PWHash(PasswordHashString);

impl fmt::Display for PWHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Serialize for PWHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PWHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let hash = PasswordHashString::from_str(&s)
            .map_err(|_| <D::Error as serde::de::Error>::custom("Invalid PHC string"))?;
        Ok(PWHash(hash))
    }
}

/// Calcule un haché a partir d'un mot de passe en clair, en choisissant un sel au hasard
pub fn hash(password: &str) -> Result<PWHash, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    // Argon2id with the generated salt
    let hash = DEFAULT_HASHER
        .hash_password(password.as_bytes(), &salt)?
        .serialize();

    Ok(PWHash(hash))
}

/// Vérifie si le mot de passe correspond au hash stocké.
///
/// Si un hash n'est pas fourni, on doit quand même tester
/// le mot de passe avec un faux hash pour éviter une timing
/// attack.
pub fn verify(password: &str, maybe_hash: Option<&PWHash>) -> bool {
    let Some(hash) = maybe_hash.or(EMPTY_HASH.as_ref()) else {
        return false;
    };

    let matches = DEFAULT_HASHER
        .verify_password(password.as_bytes(), &hash.0.password_hash())
        .is_ok();

    // The dummy hash must never authenticate anybody
    matches && maybe_hash.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash("correct horse").unwrap();
        assert!(verify("correct horse", Some(&hashed)));
        assert!(!verify("wrong horse", Some(&hashed)));
    }

    #[test]
    fn test_salt_is_random() {
        let first = hash("same").unwrap();
        let second = hash("same").unwrap();
        assert_ne!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_missing_hash_never_verifies() {
        assert!(!verify("", None));
        assert!(!verify("anything", None));
    }

    #[test]
    fn test_serde_round_trip_keeps_phc_string() {
        let hashed = hash("pw").unwrap();
        let json = serde_json::to_string(&hashed).unwrap();
        assert!(json.starts_with("\"$argon2id$"));

        let back: PWHash = serde_json::from_str(&json).unwrap();
        assert!(verify("pw", Some(&back)));
        assert!(serde_json::from_str::<PWHash>("\"not a hash\"").is_err());
    }
}
