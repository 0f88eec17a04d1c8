use crate::{
    db::review::validate_review_input,
    errors::AppError,
    models::{ReviewView, Subject, review::NewReview, subject::SubjectRef},
    state::SharedStore,
};

pub async fn create_review(
    actor_id: i32,
    subject: SubjectRef,
    text: &str,
    rating: i32,
    store: SharedStore,
) -> Result<ReviewView, AppError> {
    let subject = Subject::try_from(subject)?;
    let text = validate_review_input(text, rating)?;

    if !store.subject_exists(subject).await? {
        return Err(subject.not_found());
    }

    if store.find_review_by_owner(actor_id, subject).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "You have already reviewed this {}",
            subject.kind()
        )));
    }

    // The pre-check above is advisory: a concurrent insert still surfaces as
    // Conflict from the store's unique index.
    let review = store
        .insert_review(NewReview {
            user_id: actor_id,
            subject,
            text,
            rating,
        })
        .await?;

    let owner = store
        .find_user_by_id(actor_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    tracing::info!("User {} reviewed {} (review {})", actor_id, subject, review.id);
    Ok(ReviewView::new(review, owner.email))
}
