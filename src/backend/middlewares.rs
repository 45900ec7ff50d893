//! Extracteur d'authentification.
//! Vérifie le jeton `Authorization: Bearer` de chaque requête et recharge
//! l'utilisateur correspondant; aucune session n'est conservée.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use log::warn;

use crate::backend::router::AppState;
use crate::models::{Role, User};
use crate::utils::error_messages::AppError;

/// Utilisateur authentifié par son jeton
pub struct AuthUser(pub User);

impl AuthUser {
    /// Second contrôle: le rôle de l'appelant doit correspondre.
    pub fn require_role(self, role: Role) -> Result<User, AppError> {
        let AuthUser(user) = self;
        if user.role != role {
            warn!("User {} ({}) denied, {role} role required", user.username, user.role);
            return Err(AppError::role_required(role));
        }
        Ok(user)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<AppState>()
            .cloned()
            .ok_or_else(|| AppError::Internal("application state missing".into()))?;

        let token = bearer_token(parts).ok_or_else(|| {
            warn!("Missing bearer token");
            AppError::Unauthorized
        })?;

        let claims = state.tokens.verify(token).map_err(|e| {
            warn!("Rejected token: {e}");
            AppError::Unauthorized
        })?;

        match state.store.find_user_by_username(&claims.sub).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!("Token subject {} does not resolve to a user", claims.sub);
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Médecin authentifié. Rejette avec 403 avant la lecture du corps.
pub struct DoctorUser(pub User);

/// Patient authentifié. Rejette avec 403 avant la lecture du corps.
pub struct PatientUser(pub User);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for DoctorUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        auth.require_role(Role::Doctor).map(DoctorUser)
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for PatientUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        auth.require_role(Role::Patient).map(PatientUser)
    }
}
