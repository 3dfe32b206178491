use crate::{error::ApiError, state::AppState};
use axum::{extract::FromRequestParts, http::request::Parts};
use database::{
    entities::users,
    services::user::{Identity, UserService},
};
use models::enums::UserRole;
use serde::{Deserialize, Serialize};

/// Claims read from a validated access token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// The user behind the request's access token, provisioned on first sight
#[derive(Debug, Clone)]
pub struct CurrentUser(pub users::Model);

impl CurrentUser {
    pub fn role(&self) -> UserRole {
        self.0.role
    }

    /// Fails with `403` unless the user has one of `roles`
    pub fn require(&self, roles: &[UserRole], message: &str) -> Result<(), ApiError> {
        if roles.contains(&self.0.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden(message))
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        self.require(&[UserRole::Admin], "Forbidden")
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<AccessClaims>()
            .ok_or_else(ApiError::unauthorized)?;
        let external_id = claims.sub.clone().ok_or_else(ApiError::unauthorized)?;

        let user = UserService::provision(
            &state.db,
            Identity {
                external_id,
                email: claims.email.clone(),
                name: claims.name.clone(),
            },
        )
        .await?;

        Ok(CurrentUser(user))
    }
}
