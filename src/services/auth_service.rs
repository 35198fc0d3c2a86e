use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser},
    error::{AppError, AppResult},
    models::{CurrentUser, User},
    response::{ApiResponse, Meta},
    state::AppState,
    storage::{StorageHandle, keys},
    store::UserStore,
    tab::Tab,
    validation::{self, ValidationErrors},
};

pub const DEMO_EMAIL: &str = "demo@eternia.cl";
pub const DEMO_PASSWORD: &str = "Eternia123";

pub fn register_user(
    state: &AppState,
    tab: &Tab,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<RegisteredUser>> {
    let mut errors = ValidationErrors::new();
    let nombre_completo = errors.check(
        "nombreCompleto",
        &validation::full_name(),
        &payload.nombre_completo,
    );
    let telefono = errors.check("telefono", &validation::phone(), &payload.telefono);
    let email = errors.check("email", &validation::email(), &payload.email);
    let password = errors.check(
        "password",
        &validation::password(state.config.min_password_length),
        &payload.password,
    );
    if payload.confirm_password != payload.password {
        errors.add("confirmPassword", "Las contraseñas no coinciden.");
    }
    errors.into_result()?;

    let users = tab.users();
    let email = email.unwrap_or_default();
    if users.find_by_email(&email).is_some() {
        return Err(AppError::BadRequest("El email ya está registrado.".to_string()));
    }

    let user = User {
        nombre_completo: nombre_completo.unwrap_or_default(),
        telefono: telefono.unwrap_or_default(),
        email,
        password: password.unwrap_or_default(),
    };
    users.insert(user.clone())?;
    tracing::info!(email = %user.email, "user registered");

    let data = RegisteredUser {
        nombre_completo: user.nombre_completo,
        telefono: user.telefono,
        email: user.email,
    };
    Ok(ApiResponse::success("User created", data, None))
}

pub fn login_user(tab: &Tab, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let mut errors = ValidationErrors::new();
    let email = errors.check("email", &validation::email(), &payload.email);
    errors.check(
        "password",
        &validation::required("Ingresa tu contraseña.").untrimmed(),
        &payload.password,
    );
    errors.into_result()?;

    let user = tab
        .users()
        .find_by_email(&email.unwrap_or_default())
        .filter(|user| user.password == payload.password)
        .ok_or_else(|| {
            AppError::BadRequest("Nombre de usuario o contraseña inválidos.".into())
        })?;

    let current = CurrentUser {
        email: user.email,
        nombre_completo: user.nombre_completo,
        login_at: Utc::now(),
    };
    let token = Uuid::new_v4().to_string();

    let local = tab.local();
    local.write_json(keys::CURRENT_USER, &current)?;
    local.set_item(keys::AUTH_TOKEN, token.clone())?;
    tracing::info!(email = %current.email, tab = %tab.id(), "user logged in");

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user: current,
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub fn logout_user(tab: &Tab) -> AppResult<ApiResponse<serde_json::Value>> {
    let local = tab.local();
    local.remove_item(keys::AUTH_TOKEN)?;
    local.remove_item(keys::CURRENT_USER)?;
    tracing::info!(tab = %tab.id(), "user logged out");
    Ok(ApiResponse::success(
        "Logged out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub fn current_user(local: &StorageHandle) -> Option<CurrentUser> {
    local.read_json(keys::CURRENT_USER)
}

/// Store the demo account unless its email is already registered.
/// Returns whether it was inserted.
pub fn seed_demo_user(local: &StorageHandle) -> AppResult<bool> {
    let users = UserStore::new(local.clone());
    if users.find_by_email(DEMO_EMAIL).is_some() {
        return Ok(false);
    }
    users.insert(User {
        nombre_completo: "Usuario Demo".to_string(),
        telefono: "+56912345678".to_string(),
        email: DEMO_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
    })?;
    tracing::info!(email = DEMO_EMAIL, "demo user seeded");
    Ok(true)
}
