//! Émission et vérification des jetons d'accès (JWT signés HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::ACCESS_TOKEN_EXPIRE_MINUTES;
use crate::models::Role;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Les revendications embarquées dans un jeton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Username du titulaire
    pub sub: String,
    pub role: Role,
    pub user_id: String,
    /// Expiration absolue, en secondes depuis l'epoch
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
    #[error("Invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Clés dérivées du secret partagé, construites une seule fois au démarrage.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Émet un jeton valable `ACCESS_TOKEN_EXPIRE_MINUTES` minutes.
    pub fn issue(&self, username: &str, role: Role, user_id: &str) -> Result<String, TokenError> {
        let exp = Utc::now() + Duration::minutes(ACCESS_TOKEN_EXPIRE_MINUTES);
        let claims = Claims {
            sub: username.to_string(),
            role,
            user_id: user_id.to_string(),
            exp: exp.timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Vérifie la signature et l'expiration, puis renvoie les revendications.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenKeys(..)")
    }
}

#[cfg(test)]
pub(crate) fn expired_token(keys: &TokenKeys, username: &str, role: Role) -> String {
    let claims = Claims {
        sub: username.to_string(),
        role,
        user_id: "expired".to_string(),
        exp: (Utc::now() - Duration::minutes(5)).timestamp(),
    };
    keys.sign(&claims).unwrap()
}
