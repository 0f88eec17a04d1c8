use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::subject::{Subject, SubjectRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Poster {
    pub id: i32,
    pub subject: Subject,
    pub url: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPoster {
    pub subject: Subject,
    pub url: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterView {
    pub id: i32,
    pub movie_id: Option<i32>,
    pub series_id: Option<i32>,
    pub url: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<Poster> for PosterView {
    fn from(poster: Poster) -> Self {
        let (movie_id, series_id) = poster.subject.columns();
        Self {
            id: poster.id,
            movie_id,
            series_id,
            url: poster.url,
            mime_type: poster.mime_type,
            created_at: poster.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterCreate {
    #[serde(flatten)]
    pub subject: SubjectRef,
    pub url: String,
    pub mime_type: String,
}
