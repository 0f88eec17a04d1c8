use crate::{
    errors::AppError,
    models::{Subject, poster::PosterView},
    state::SharedStore,
};

pub async fn list_posters_for_subject(
    subject: Subject,
    store: SharedStore,
) -> Result<Vec<PosterView>, AppError> {
    if !store.subject_exists(subject).await? {
        return Err(subject.not_found());
    }

    let posters = store.list_posters(subject).await?;
    Ok(posters.into_iter().map(PosterView::from).collect())
}
