use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::subject::{Subject, SubjectRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub subject: Subject,
    pub text: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i32,
    pub subject: Subject,
    pub text: String,
    pub rating: i32,
}

/// A review as returned to clients, with the owner's email denormalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: i32,
    pub user_id: i32,
    pub user_email: String,
    pub movie_id: Option<i32>,
    pub series_id: Option<i32>,
    pub text: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReviewView {
    pub fn new(review: Review, user_email: String) -> Self {
        let (movie_id, series_id) = review.subject.columns();
        Self {
            id: review.id,
            user_id: review.user_id,
            user_email,
            movie_id,
            series_id,
            text: review.text,
            rating: review.rating,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreate {
    #[serde(flatten)]
    pub subject: SubjectRef,
    pub text: String,
    pub rating: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    pub text: String,
    pub rating: i32,
}
