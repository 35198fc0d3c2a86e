use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{error::AppError, state::AppState, storage::TabId, tab::Tab};

pub const TAB_HEADER: &str = "x-tab-id";

/// The open tab named by the `x-tab-id` header.
#[derive(Clone)]
pub struct TabContext(pub Arc<Tab>);

impl std::ops::Deref for TabContext {
    type Target = Arc<Tab>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for TabContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(TAB_HEADER)
            .ok_or_else(|| AppError::BadRequest("Missing x-tab-id header".into()))?;

        let id = header
            .to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or_else(|| AppError::BadRequest("Invalid x-tab-id header".into()))?;

        state
            .tabs
            .get(TabId::from(id))
            .map(TabContext)
            .ok_or(AppError::NotFound)
    }
}
