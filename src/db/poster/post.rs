use crate::{
    errors::AppError,
    models::{
        Actor, Subject,
        poster::{NewPoster, PosterView},
        subject::SubjectRef,
    },
    policy::can_manage_catalog,
    state::SharedStore,
};

const MAX_MIME_TYPE_LENGTH: usize = 100;

fn validate_poster_input(url: &str, mime_type: &str) -> Result<(String, String), AppError> {
    let url = url.trim();
    let host = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .and_then(|rest| rest.split(['/', '?', '#']).next())
        .unwrap_or_default();
    if host.is_empty() || url.contains(char::is_whitespace) {
        return Err(AppError::BadRequest(
            "Poster url must be an http(s) URL".into(),
        ));
    }

    let mime_type = mime_type.trim().to_lowercase();
    if mime_type.len() > MAX_MIME_TYPE_LENGTH || !mime_type.starts_with("image/") {
        return Err(AppError::BadRequest(
            "Poster mimeType must be an image type".into(),
        ));
    }

    Ok((url.to_string(), mime_type))
}

pub async fn create_poster(
    actor: Actor,
    subject: SubjectRef,
    url: &str,
    mime_type: &str,
    store: SharedStore,
) -> Result<PosterView, AppError> {
    if !can_manage_catalog(&actor) {
        return Err(AppError::Forbidden("Only admins can add posters".into()));
    }

    let subject = Subject::try_from(subject)?;
    let (url, mime_type) = validate_poster_input(url, mime_type)?;

    if !store.subject_exists(subject).await? {
        return Err(subject.not_found());
    }

    let poster = store
        .insert_poster(NewPoster {
            subject,
            url,
            mime_type,
        })
        .await?;

    tracing::info!("Poster {} attached to {}", poster.id, subject);
    Ok(PosterView::from(poster))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poster_input_rules() {
        assert!(validate_poster_input("https://cdn.test/p.jpg", "image/jpeg").is_ok());
        assert!(validate_poster_input("ftp://cdn.test/p.jpg", "image/jpeg").is_err());
        assert!(validate_poster_input("https://", "image/jpeg").is_err());
        assert!(validate_poster_input("http:///p.jpg", "image/jpeg").is_err());
        assert!(validate_poster_input("https://cdn.test/p.jpg", "text/html").is_err());
        assert_eq!(
            validate_poster_input(" https://cdn.test/p.png ", "IMAGE/PNG").unwrap(),
            ("https://cdn.test/p.png".to_string(), "image/png".to_string())
        );
    }
}
