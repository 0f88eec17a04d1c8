//! In-process store used for tests and database-less local runs.
//!
//! Enforces the same constraints as the Postgres schema: unique emails, one
//! review per (user, subject), and references that must exist.

use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    errors::AppError,
    models::{
        Movie, Poster, Review, Series, Subject, User, UserRole,
        catalog::{CatalogQuery, CatalogSort, NewMovie, NewSeries},
        poster::NewPoster,
        review::NewReview,
        user::NewUser,
    },
    store::{CinemaStore, average},
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    movies: BTreeMap<i32, Movie>,
    series: BTreeMap<i32, Series>,
    reviews: BTreeMap<i32, Review>,
    posters: BTreeMap<i32, Poster>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn subject_exists(&self, subject: Subject) -> bool {
        match subject {
            Subject::Movie(id) => self.movies.contains_key(&id),
            Subject::Series(id) => self.series.contains_key(&id),
        }
    }

    fn refresh_average_rating(&mut self, subject: Subject) {
        let avg = average(
            self.reviews
                .values()
                .filter(|r| r.subject == subject)
                .map(|r| r.rating),
        );

        match subject {
            Subject::Movie(id) => {
                if let Some(movie) = self.movies.get_mut(&id) {
                    movie.average_rating = avg;
                }
            }
            Subject::Series(id) => {
                if let Some(series) = self.series.get_mut(&id) {
                    series.average_rating = avg;
                }
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_movie(&self, movie: NewMovie) -> Movie {
        let mut tables = self.tables.lock().await;
        let movie = Movie {
            id: tables.next_id(),
            title: movie.title,
            director: movie.director,
            genre: movie.genre,
            box_office: movie.box_office,
            average_rating: 0.0,
        };
        tables.movies.insert(movie.id, movie.clone());
        movie
    }

    pub async fn insert_series(&self, series: NewSeries) -> Series {
        let mut tables = self.tables.lock().await;
        let series = Series {
            id: tables.next_id(),
            title: series.title,
            genre: series.genre,
            average_rating: 0.0,
        };
        tables.series.insert(series.id, series.clone());
        series
    }

    /// Changes a user's role, e.g. to promote a seeded account to admin.
    pub async fn set_role(&self, user_id: i32, role: UserRole) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.role = role;
        Ok(())
    }

    /// Deletes a movie and cascades to its reviews and posters.
    pub async fn delete_movie(&self, id: i32) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        tables
            .movies
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Movie not found".into()))?;

        let subject = Subject::Movie(id);
        tables.reviews.retain(|_, r| r.subject != subject);
        tables.posters.retain(|_, p| p.subject != subject);
        Ok(())
    }
}

fn matches_genre(genre: &str, filter: Option<&str>) -> bool {
    filter.is_none_or(|f| genre.eq_ignore_ascii_case(f))
}

fn catalog_cmp(
    sort: CatalogSort,
    (a_id, a_title, a_rating): (i32, &str, f64),
    (b_id, b_title, b_rating): (i32, &str, f64),
) -> Ordering {
    match sort {
        CatalogSort::Title => a_title.cmp(b_title).then(a_id.cmp(&b_id)),
        CatalogSort::Rating => b_rating
            .total_cmp(&a_rating)
            .then_with(|| a_title.cmp(b_title)),
        CatalogSort::Newest => b_id.cmp(&a_id),
    }
}

#[async_trait]
impl CinemaStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".into(),
            ));
        }

        let user = User {
            id: tables.next_id(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_movies(&self, query: &CatalogQuery) -> Result<Vec<Movie>, AppError> {
        let tables = self.tables.lock().await;
        let genre = query.genre_filter();
        let mut movies: Vec<Movie> = tables
            .movies
            .values()
            .filter(|m| matches_genre(&m.genre, genre))
            .cloned()
            .collect();

        movies.sort_by(|a, b| {
            catalog_cmp(
                query.sort,
                (a.id, a.title.as_str(), a.average_rating),
                (b.id, b.title.as_str(), b.average_rating),
            )
        });
        Ok(movies)
    }

    async fn find_movie(&self, id: i32) -> Result<Option<Movie>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.movies.get(&id).cloned())
    }

    async fn list_series(&self, query: &CatalogQuery) -> Result<Vec<Series>, AppError> {
        let tables = self.tables.lock().await;
        let genre = query.genre_filter();
        let mut series: Vec<Series> = tables
            .series
            .values()
            .filter(|s| matches_genre(&s.genre, genre))
            .cloned()
            .collect();

        series.sort_by(|a, b| {
            catalog_cmp(
                query.sort,
                (a.id, a.title.as_str(), a.average_rating),
                (b.id, b.title.as_str(), b.average_rating),
            )
        });
        Ok(series)
    }

    async fn find_series(&self, id: i32) -> Result<Option<Series>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.series.get(&id).cloned())
    }

    async fn subject_exists(&self, subject: Subject) -> Result<bool, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.subject_exists(subject))
    }

    async fn list_reviews(&self, subject: Subject) -> Result<Vec<(Review, String)>, AppError> {
        let tables = self.tables.lock().await;
        let mut reviews: Vec<(Review, String)> = tables
            .reviews
            .values()
            .filter(|r| r.subject == subject)
            .filter_map(|r| {
                tables
                    .users
                    .get(&r.user_id)
                    .map(|u| (r.clone(), u.email.clone()))
            })
            .collect();

        reviews.sort_by(|(a, _), (b, _)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(reviews)
    }

    async fn find_review(&self, id: i32) -> Result<Option<Review>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.reviews.get(&id).cloned())
    }

    async fn find_review_by_owner(
        &self,
        user_id: i32,
        subject: Subject,
    ) -> Result<Option<Review>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .reviews
            .values()
            .find(|r| r.user_id == user_id && r.subject == subject)
            .cloned())
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review, AppError> {
        let mut tables = self.tables.lock().await;

        if !tables.users.contains_key(&review.user_id) || !tables.subject_exists(review.subject) {
            return Err(AppError::NotFound("Referenced record not found".into()));
        }
        if tables
            .reviews
            .values()
            .any(|r| r.user_id == review.user_id && r.subject == review.subject)
        {
            return Err(AppError::Conflict(format!(
                "You have already reviewed this {}",
                review.subject.kind()
            )));
        }

        let review = Review {
            id: tables.next_id(),
            user_id: review.user_id,
            subject: review.subject,
            text: review.text,
            rating: review.rating,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.reviews.insert(review.id, review.clone());
        tables.refresh_average_rating(review.subject);
        Ok(review)
    }

    async fn update_review(
        &self,
        id: i32,
        text: &str,
        rating: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<Review, AppError> {
        let mut tables = self.tables.lock().await;
        let review = tables
            .reviews
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

        review.text = text.to_string();
        review.rating = rating;
        review.updated_at = Some(updated_at);
        let review = review.clone();

        tables.refresh_average_rating(review.subject);
        Ok(review)
    }

    async fn delete_review(&self, id: i32) -> Result<(), AppError> {
        let mut tables = self.tables.lock().await;
        let review = tables
            .reviews
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

        tables.refresh_average_rating(review.subject);
        Ok(())
    }

    async fn insert_poster(&self, poster: NewPoster) -> Result<Poster, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.subject_exists(poster.subject) {
            return Err(AppError::NotFound("Referenced record not found".into()));
        }

        let poster = Poster {
            id: tables.next_id(),
            subject: poster.subject,
            url: poster.url,
            mime_type: poster.mime_type,
            created_at: Utc::now(),
        };
        tables.posters.insert(poster.id, poster.clone());
        Ok(poster)
    }

    async fn list_posters(&self, subject: Subject) -> Result<Vec<Poster>, AppError> {
        let tables = self.tables.lock().await;
        let mut posters: Vec<Poster> = tables
            .posters
            .values()
            .filter(|p| p.subject == subject)
            .cloned()
            .collect();

        posters.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(posters)
    }
}
