use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::sync::Badges;

#[derive(Debug, Serialize, ToSchema)]
pub struct TabOpened {
    pub tab_id: Uuid,
    pub badges: Badges,
}
