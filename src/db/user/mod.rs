pub mod get;
pub mod post;

pub use get::{get_user_by_email, login, validate_user};
pub use post::register;

use crate::{
    auth::JwtKeys,
    errors::AppError,
    models::{User, user::LoginResponse},
};

const MAX_EMAIL_LENGTH: usize = 255;

/// Emails are compared case-insensitively, so they are stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    email.len() <= MAX_EMAIL_LENGTH
        && !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

pub fn login_response(user: &User, jwt: &JwtKeys) -> Result<LoginResponse, AppError> {
    let (token, expires_at) = jwt.generate_jwt(user)?;

    Ok(LoginResponse {
        token,
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("critic@example.com"));
        assert!(!is_valid_email("critic.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("critic@localhost"));
        assert!(!is_valid_email("cri tic@example.com"));
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_email("  Critic@Example.COM "), "critic@example.com");
    }
}
