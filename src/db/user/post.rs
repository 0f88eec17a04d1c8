use crate::{
    auth::{JwtKeys, password::hash_password},
    db::user::{is_valid_email, login_response, normalize_email},
    errors::AppError,
    models::{
        UserRole,
        user::{LoginResponse, NewUser},
    },
    state::SharedStore,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub async fn register(
    email: &str,
    password: &str,
    store: SharedStore,
    jwt: &JwtKeys,
) -> Result<LoginResponse, AppError> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".into(),
        ));
    }

    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| AppError::InternalError)??;

    // The unique index on email settles concurrent registrations.
    let user = store
        .insert_user(NewUser {
            email,
            password_hash,
            role: UserRole::default(),
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.id, user.email);
    login_response(&user, jwt)
}
