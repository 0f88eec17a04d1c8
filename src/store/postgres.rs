use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, postgres::PgPoolOptions};

use crate::{
    errors::AppError,
    models::{
        Movie, Poster, Review, Series, Subject, User,
        catalog::{CatalogQuery, CatalogSort},
        poster::NewPoster,
        review::NewReview,
        user::NewUser,
    },
    store::CinemaStore,
};

const REVIEW_COLUMNS: &str =
    "r.id, r.user_id, r.movie_id, r.series_id, r.text, r.rating, r.created_at, r.updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

        tracing::debug!("postgres pool created");
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("database migrations applied");
        Ok(())
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i32,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct ReviewRow {
    id: i32,
    user_id: i32,
    movie_id: Option<i32>,
    series_id: Option<i32>,
    text: String,
    rating: i32,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = AppError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let subject = Subject::from_columns(row.movie_id, row.series_id).map_err(|_| {
            AppError::DatabaseError(format!("Review {} has an invalid subject", row.id))
        })?;

        Ok(Review {
            id: row.id,
            user_id: row.user_id,
            subject,
            text: row.text,
            rating: row.rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ReviewWithEmailRow {
    #[sqlx(flatten)]
    review: ReviewRow,
    user_email: String,
}

#[derive(FromRow)]
struct PosterRow {
    id: i32,
    movie_id: Option<i32>,
    series_id: Option<i32>,
    url: String,
    mime_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PosterRow> for Poster {
    type Error = AppError;

    fn try_from(row: PosterRow) -> Result<Self, Self::Error> {
        let subject = Subject::from_columns(row.movie_id, row.series_id).map_err(|_| {
            AppError::DatabaseError(format!("Poster {} has an invalid subject", row.id))
        })?;

        Ok(Poster {
            id: row.id,
            subject,
            url: row.url,
            mime_type: row.mime_type,
            created_at: row.created_at,
        })
    }
}

fn subject_column(subject: Subject) -> &'static str {
    match subject {
        Subject::Movie(_) => "movie_id",
        Subject::Series(_) => "series_id",
    }
}

fn catalog_order(sort: CatalogSort) -> &'static str {
    match sort {
        CatalogSort::Title => "title ASC, id ASC",
        CatalogSort::Rating => "average_rating DESC, title ASC",
        CatalogSort::Newest => "id DESC",
    }
}

/// Recomputes the derived average rating for `subject` on the caller's
/// transaction.
async fn refresh_average_rating(conn: &mut PgConnection, subject: Subject) -> Result<(), AppError> {
    let sql = match subject {
        Subject::Movie(_) => {
            "UPDATE movies
            SET average_rating = COALESCE(
                (SELECT AVG(rating)::float8 FROM reviews WHERE movie_id = $1), 0)
            WHERE id = $1"
        }
        Subject::Series(_) => {
            "UPDATE series
            SET average_rating = COALESCE(
                (SELECT AVG(rating)::float8 FROM reviews WHERE series_id = $1), 0)
            WHERE id = $1"
        }
    };

    sqlx::query(sql).bind(subject.id()).execute(&mut *conn).await?;
    Ok(())
}

#[async_trait]
impl CinemaStore for PgStore {
    #[tracing::instrument(skip(self, email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, role, created_at",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("User with this email already exists".into())
            }
            other => other.into(),
        })?;

        User::try_from(row)
    }

    #[tracing::instrument(skip(self))]
    async fn list_movies(&self, query: &CatalogQuery) -> Result<Vec<Movie>, AppError> {
        let sql = format!(
            "SELECT id, title, director, genre, box_office::float8 AS box_office, average_rating
            FROM movies
            WHERE ($1::text IS NULL OR lower(genre) = lower($1))
            ORDER BY {}",
            catalog_order(query.sort)
        );

        let movies = sqlx::query_as::<_, Movie>(&sql)
            .bind(query.genre_filter())
            .fetch_all(&self.pool)
            .await?;

        Ok(movies)
    }

    #[tracing::instrument(skip(self))]
    async fn find_movie(&self, id: i32) -> Result<Option<Movie>, AppError> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, director, genre, box_office::float8 AS box_office, average_rating
            FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie)
    }

    #[tracing::instrument(skip(self))]
    async fn list_series(&self, query: &CatalogQuery) -> Result<Vec<Series>, AppError> {
        let sql = format!(
            "SELECT id, title, genre, average_rating
            FROM series
            WHERE ($1::text IS NULL OR lower(genre) = lower($1))
            ORDER BY {}",
            catalog_order(query.sort)
        );

        let series = sqlx::query_as::<_, Series>(&sql)
            .bind(query.genre_filter())
            .fetch_all(&self.pool)
            .await?;

        Ok(series)
    }

    #[tracing::instrument(skip(self))]
    async fn find_series(&self, id: i32) -> Result<Option<Series>, AppError> {
        let series = sqlx::query_as::<_, Series>(
            "SELECT id, title, genre, average_rating FROM series WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(series)
    }

    #[tracing::instrument(skip(self))]
    async fn subject_exists(&self, subject: Subject) -> Result<bool, AppError> {
        let sql = match subject {
            Subject::Movie(_) => "SELECT EXISTS (SELECT 1 FROM movies WHERE id = $1)",
            Subject::Series(_) => "SELECT EXISTS (SELECT 1 FROM series WHERE id = $1)",
        };

        let exists = sqlx::query_scalar::<_, bool>(sql)
            .bind(subject.id())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self))]
    async fn list_reviews(&self, subject: Subject) -> Result<Vec<(Review, String)>, AppError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS}, u.email AS user_email
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.{} = $1
            ORDER BY r.created_at DESC, r.id DESC",
            subject_column(subject)
        );

        let rows = sqlx::query_as::<_, ReviewWithEmailRow>(&sql)
            .bind(subject.id())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<(Review, String), AppError> {
                Ok((Review::try_from(row.review)?, row.user_email))
            })
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn find_review(&self, id: i32) -> Result<Option<Review>, AppError> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.id = $1");
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Review::try_from).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn find_review_by_owner(
        &self,
        user_id: i32,
        subject: Subject,
    ) -> Result<Option<Review>, AppError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.user_id = $1 AND r.{} = $2",
            subject_column(subject)
        );
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(user_id)
            .bind(subject.id())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Review::try_from).transpose()
    }

    #[tracing::instrument(skip(self, review), fields(user_id = review.user_id, subject = %review.subject))]
    async fn insert_review(&self, review: NewReview) -> Result<Review, AppError> {
        let (movie_id, series_id) = review.subject.columns();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ReviewRow>(
            "INSERT INTO reviews (user_id, movie_id, series_id, text, rating)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, movie_id, series_id, text, rating, created_at, updated_at",
        )
        .bind(review.user_id)
        .bind(movie_id)
        .bind(series_id)
        .bind(&review.text)
        .bind(review.rating)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("You have already reviewed this {}", review.subject.kind()))
            }
            other => other.into(),
        })?;

        refresh_average_rating(&mut tx, review.subject).await?;
        tx.commit().await?;

        Review::try_from(row)
    }

    #[tracing::instrument(skip(self, text))]
    async fn update_review(
        &self,
        id: i32,
        text: &str,
        rating: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<Review, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ReviewRow>(
            "UPDATE reviews SET text = $2, rating = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, user_id, movie_id, series_id, text, rating, created_at, updated_at",
        )
        .bind(id)
        .bind(text)
        .bind(rating)
        .bind(updated_at)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

        let review = Review::try_from(row)?;
        refresh_average_rating(&mut tx, review.subject).await?;
        tx.commit().await?;

        Ok(review)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_review(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ReviewRow>(
            "DELETE FROM reviews WHERE id = $1
            RETURNING id, user_id, movie_id, series_id, text, rating, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))?;

        let review = Review::try_from(row)?;
        refresh_average_rating(&mut tx, review.subject).await?;
        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, poster), fields(subject = %poster.subject))]
    async fn insert_poster(&self, poster: NewPoster) -> Result<Poster, AppError> {
        let (movie_id, series_id) = poster.subject.columns();

        let row = sqlx::query_as::<_, PosterRow>(
            "INSERT INTO posters (movie_id, series_id, url, mime_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, movie_id, series_id, url, mime_type, created_at",
        )
        .bind(movie_id)
        .bind(series_id)
        .bind(&poster.url)
        .bind(&poster.mime_type)
        .fetch_one(&self.pool)
        .await?;

        Poster::try_from(row)
    }

    #[tracing::instrument(skip(self))]
    async fn list_posters(&self, subject: Subject) -> Result<Vec<Poster>, AppError> {
        let sql = format!(
            "SELECT id, movie_id, series_id, url, mime_type, created_at
            FROM posters
            WHERE {} = $1
            ORDER BY created_at ASC, id ASC",
            subject_column(subject)
        );

        let rows = sqlx::query_as::<_, PosterRow>(&sql)
            .bind(subject.id())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Poster::try_from).collect()
    }
}
