use crate::{
    auth::{JwtKeys, password::verify_password},
    db::user::{login_response, normalize_email},
    errors::AppError,
    models::{User, user::LoginResponse},
    state::SharedStore,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn get_user_by_email(email: &str, store: SharedStore) -> Result<Option<User>, AppError> {
    store.find_user_by_email(&normalize_email(email)).await
}

/// Returns the user only if `password` verifies against the stored hash.
async fn authenticate(
    email: &str,
    password: &str,
    store: SharedStore,
) -> Result<Option<User>, AppError> {
    let Some(user) = get_user_by_email(email, store).await? else {
        return Ok(None);
    };

    let password = password.to_string();
    let stored_hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|_| AppError::InternalError)??;

    Ok(verified.then_some(user))
}

pub async fn validate_user(email: &str, password: &str, store: SharedStore) -> Result<bool, AppError> {
    Ok(authenticate(email, password, store).await?.is_some())
}

pub async fn login(
    email: &str,
    password: &str,
    store: SharedStore,
    jwt: &JwtKeys,
) -> Result<LoginResponse, AppError> {
    let user = authenticate(email, password, store)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    tracing::info!("User {} logged in", user.id);
    login_response(&user, jwt)
}
