use crate::{errors::AppError, models::Actor, policy::can_delete, state::SharedStore};

pub async fn delete_review(actor: Actor, review_id: i32, store: SharedStore) -> Result<(), AppError> {
    let existing = store
        .find_review(review_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

    if !can_delete(&actor, existing.user_id) {
        tracing::warn!(
            "User {} tried to delete review {} owned by {}",
            actor.id,
            review_id,
            existing.user_id
        );
        return Err(AppError::Forbidden(
            "You can only delete your own reviews".into(),
        ));
    }

    store.delete_review(review_id).await?;

    tracing::info!("Review {} deleted by user {}", review_id, actor.id);
    Ok(())
}
