use crate::{
    errors::AppError,
    models::{ReviewView, Subject},
    state::SharedStore,
};

pub async fn list_reviews_for_subject(
    subject: Subject,
    store: SharedStore,
) -> Result<Vec<ReviewView>, AppError> {
    if !store.subject_exists(subject).await? {
        return Err(subject.not_found());
    }

    let reviews = store
        .list_reviews(subject)
        .await?
        .into_iter()
        .map(|(review, email)| ReviewView::new(review, email))
        .collect();

    Ok(reviews)
}
