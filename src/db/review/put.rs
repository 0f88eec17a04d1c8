use chrono::Utc;

use crate::{
    db::review::validate_review_input,
    errors::AppError,
    models::{Actor, ReviewView},
    policy::can_modify,
    state::SharedStore,
};

pub async fn update_review(
    actor: Actor,
    review_id: i32,
    text: &str,
    rating: i32,
    store: SharedStore,
) -> Result<ReviewView, AppError> {
    let text = validate_review_input(text, rating)?;

    let existing = store
        .find_review(review_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

    if !can_modify(&actor, existing.user_id) {
        tracing::warn!(
            "User {} tried to edit review {} owned by {}",
            actor.id,
            review_id,
            existing.user_id
        );
        return Err(AppError::Forbidden(
            "You can only edit your own reviews".into(),
        ));
    }

    let review = store
        .update_review(review_id, &text, rating, Utc::now())
        .await?;

    let owner = store
        .find_user_by_id(review.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(ReviewView::new(review, owner.email))
}
