use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    error::AppError,
    middleware::tab::TabContext,
    models::CurrentUser,
    services::auth_service,
    state::AppState,
    storage::keys,
};

/// The logged-in user, for requests whose bearer token matches the stored
/// `authToken`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TabContext(tab) = TabContext::from_request_parts(parts, state).await?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

        let Some(token) = auth_str.strip_prefix("Bearer ") else {
            return Err(AppError::BadRequest("Invalid Authorization scheme".into()));
        };

        let local = tab.local();
        let stored = local.get_item(keys::AUTH_TOKEN).ok_or(AppError::Unauthorized)?;
        if stored != token.trim() {
            return Err(AppError::Unauthorized);
        }

        auth_service::current_user(local)
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
