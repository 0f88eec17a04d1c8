//! Storage backends for users, the catalog, reviews and posters.
//!
//! Every write that touches reviews also recomputes the subject's average
//! rating inside the same transaction. Constraint violations come back as
//! [`AppError::Conflict`] (uniqueness), [`AppError::BadRequest`] (subject
//! exclusivity) or [`AppError::NotFound`] (dangling reference).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    errors::AppError,
    models::{
        Movie, Poster, Review, Series, Subject, User,
        catalog::CatalogQuery,
        poster::NewPoster,
        review::NewReview,
        user::NewUser,
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait CinemaStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn list_movies(&self, query: &CatalogQuery) -> Result<Vec<Movie>, AppError>;
    async fn find_movie(&self, id: i32) -> Result<Option<Movie>, AppError>;
    async fn list_series(&self, query: &CatalogQuery) -> Result<Vec<Series>, AppError>;
    async fn find_series(&self, id: i32) -> Result<Option<Series>, AppError>;
    async fn subject_exists(&self, subject: Subject) -> Result<bool, AppError>;

    /// Reviews for `subject` paired with the owner's email, newest first.
    async fn list_reviews(&self, subject: Subject) -> Result<Vec<(Review, String)>, AppError>;
    async fn find_review(&self, id: i32) -> Result<Option<Review>, AppError>;
    async fn find_review_by_owner(
        &self,
        user_id: i32,
        subject: Subject,
    ) -> Result<Option<Review>, AppError>;
    async fn insert_review(&self, review: NewReview) -> Result<Review, AppError>;
    async fn update_review(
        &self,
        id: i32,
        text: &str,
        rating: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<Review, AppError>;
    async fn delete_review(&self, id: i32) -> Result<(), AppError>;

    async fn insert_poster(&self, poster: NewPoster) -> Result<Poster, AppError>;
    async fn list_posters(&self, subject: Subject) -> Result<Vec<Poster>, AppError>;
}

/// Mean of `ratings`, or 0.0 for a subject nobody has reviewed yet.
pub(crate) fn average(ratings: impl IntoIterator<Item = i32>) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0u32), |(sum, count), r| (sum + r as i64, count + 1));

    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
