use eternia_storefront::{
    config::AppConfig,
    dto::auth::{LoginRequest, RegisterRequest},
    error::AppError,
    models::CurrentUser,
    services::auth_service::{self, DEMO_EMAIL, DEMO_PASSWORD},
    state::AppState,
    storage::{SharedStorage, keys},
};

fn register_form(email: &str) -> RegisterRequest {
    RegisterRequest {
        nombre_completo: "Javiera Muñoz".into(),
        telefono: "9 1111 2222".into(),
        email: email.into(),
        password: "Secreta123".into(),
        confirm_password: "Secreta123".into(),
    }
}

#[tokio::test]
async fn register_then_login_writes_the_session_marker() -> anyhow::Result<()> {
    let state = AppState::with_storage(AppConfig::default(), SharedStorage::in_memory());
    let tab = state.tabs.open();

    let user = auth_service::register_user(&state, &tab, register_form(" Javiera@Correo.CL "))?
        .data
        .expect("user");
    assert_eq!(user.email, "javiera@correo.cl");
    assert_eq!(user.telefono, "+56911112222");

    let login = auth_service::login_user(
        &tab,
        LoginRequest {
            email: "JAVIERA@correo.cl".into(),
            password: "Secreta123".into(),
        },
    )?
    .data
    .expect("login");

    let stored: CurrentUser = tab.local().read_json(keys::CURRENT_USER).expect("currentUser");
    assert_eq!(stored.email, "javiera@correo.cl");
    assert_eq!(stored.nombre_completo, "Javiera Muñoz");

    let token = tab.local().get_item(keys::AUTH_TOKEN).expect("authToken");
    assert_eq!(login.token, format!("Bearer {token}"));

    auth_service::logout_user(&tab)?;
    assert!(tab.local().get_item(keys::AUTH_TOKEN).is_none());
    assert!(auth_service::current_user(tab.local()).is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_in_any_case() -> anyhow::Result<()> {
    let state = AppState::with_storage(AppConfig::default(), SharedStorage::in_memory());
    let tab = state.tabs.open();

    auth_service::register_user(&state, &tab, register_form("ana@correo.cl"))?;
    let again = auth_service::register_user(&state, &tab, register_form("ANA@Correo.cl"));
    assert!(matches!(again, Err(AppError::BadRequest(_))));
    assert_eq!(tab.users().get().len(), 1);
    Ok(())
}

#[tokio::test]
async fn register_reports_every_invalid_field() {
    let state = AppState::with_storage(AppConfig::default(), SharedStorage::in_memory());
    let tab = state.tabs.open();

    let form = RegisterRequest {
        nombre_completo: "Al".into(),
        telefono: "123".into(),
        email: "no-es-email".into(),
        password: "corta".into(),
        confirm_password: "otra".into(),
    };
    let Err(AppError::Validation(errors)) = auth_service::register_user(&state, &tab, form) else {
        panic!("expected validation errors");
    };
    for field in ["nombreCompleto", "telefono", "email", "password", "confirmPassword"] {
        assert!(errors.has(field), "{field} should be invalid");
    }
}

#[tokio::test]
async fn password_length_follows_configuration() -> anyhow::Result<()> {
    let mut config = AppConfig::default();
    config.min_password_length = 6;
    let state = AppState::with_storage(config, SharedStorage::in_memory());
    let tab = state.tabs.open();

    let form = RegisterRequest {
        password: "seis66".into(),
        confirm_password: "seis66".into(),
        ..register_form("corto@correo.cl")
    };
    auth_service::register_user(&state, &tab, form)?;
    Ok(())
}

#[tokio::test]
async fn demo_user_is_seeded_once_and_can_log_in() -> anyhow::Result<()> {
    let state = AppState::with_storage(AppConfig::default(), SharedStorage::in_memory());
    let tab = state.tabs.open();

    assert!(auth_service::seed_demo_user(tab.local())?);
    assert!(!auth_service::seed_demo_user(tab.local())?);
    assert_eq!(tab.users().get().len(), 1);

    let wrong = auth_service::login_user(
        &tab,
        LoginRequest {
            email: DEMO_EMAIL.into(),
            password: "eternia123".into(),
        },
    );
    assert!(matches!(wrong, Err(AppError::BadRequest(_))));

    auth_service::login_user(
        &tab,
        LoginRequest {
            email: DEMO_EMAIL.into(),
            password: DEMO_PASSWORD.into(),
        },
    )?;
    assert!(auth_service::current_user(tab.local()).is_some());
    Ok(())
}
