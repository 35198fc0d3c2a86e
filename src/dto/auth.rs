use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CurrentUser;

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub nombre_completo: String,
    pub telefono: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: CurrentUser,
}

/// Public view of a registered account; the password never leaves storage.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub nombre_completo: String,
    pub telefono: String,
    pub email: String,
}
