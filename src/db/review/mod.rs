pub mod delete;
pub mod get;
pub mod post;
pub mod put;

pub use delete::delete_review;
pub use get::list_reviews_for_subject;
pub use post::create_review;
pub use put::update_review;

use crate::errors::AppError;

pub const MAX_TEXT_LENGTH: usize = 2000;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Trims `text` and checks it and `rating` against the review bounds.
pub fn validate_review_input(text: &str, rating: i32) -> Result<String, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("Review text must not be empty".into()));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Review text must be at most {} characters",
            MAX_TEXT_LENGTH
        )));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::BadRequest(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert_eq!(validate_review_input("  Great  ", 5).unwrap(), "Great");
        assert!(validate_review_input("   ", 3).is_err());
        assert!(validate_review_input("ok", 0).is_err());
        assert!(validate_review_input("ok", 6).is_err());
        assert!(validate_review_input(&"x".repeat(MAX_TEXT_LENGTH), 1).is_ok());
        assert!(validate_review_input(&"x".repeat(MAX_TEXT_LENGTH + 1), 1).is_err());
    }
}
