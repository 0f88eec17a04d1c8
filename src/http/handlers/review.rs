use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
};

use crate::{
    auth::AuthClaims,
    db::review::{create_review, delete_review, list_reviews_for_subject, update_review},
    http::extract::ValidatedJson,
    models::{
        ReviewView, Subject,
        review::{ReviewCreate, ReviewUpdate},
    },
    state::AppState,
};

pub async fn get_movie_reviews_handler(
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> Result<Json<Vec<ReviewView>>, (StatusCode, String)> {
    list_reviews_for_subject(Subject::Movie(movie_id), state.store.clone())
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn get_series_reviews_handler(
    State(state): State<AppState>,
    Path(series_id): Path<i32>,
) -> Result<Json<Vec<ReviewView>>, (StatusCode, String)> {
    list_reviews_for_subject(Subject::Series(series_id), state.store.clone())
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn create_review_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    ValidatedJson(payload): ValidatedJson<ReviewCreate>,
) -> Result<(StatusCode, HeaderMap, Json<ReviewView>), (StatusCode, String)> {
    let actor = claims.actor()?;

    let review = create_review(
        actor.id,
        payload.subject,
        &payload.text,
        payload.rating,
        state.store.clone(),
    )
    .await
    .map_err(|err| {
        tracing::warn!("Error creating review: {}", err);
        err.to_response()
    })?;

    let location = match (review.movie_id, review.series_id) {
        (Some(id), _) => format!("/api/reviews/movies/{id}"),
        (_, Some(id)) => format!("/api/reviews/series/{id}"),
        (None, None) => "/api/reviews".to_string(),
    };
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&location) {
        headers.insert(header::LOCATION, value);
    }

    Ok((StatusCode::CREATED, headers, Json(review)))
}

pub async fn update_review_handler(
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
    claims: AuthClaims,
    ValidatedJson(payload): ValidatedJson<ReviewUpdate>,
) -> Result<Json<ReviewView>, (StatusCode, String)> {
    let actor = claims.actor()?;

    update_review(
        actor,
        review_id,
        &payload.text,
        payload.rating,
        state.store.clone(),
    )
    .await
    .map(Json)
    .map_err(|err| {
        tracing::warn!("Error updating review {}: {}", review_id, err);
        err.to_response()
    })
}

pub async fn delete_review_handler(
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
    claims: AuthClaims,
) -> Result<StatusCode, (StatusCode, String)> {
    let actor = claims.actor()?;

    delete_review(actor, review_id, state.store.clone())
        .await
        .map_err(|err| {
            tracing::warn!("Error deleting review {}: {}", review_id, err);
            err.to_response()
        })?;

    Ok(StatusCode::NO_CONTENT)
}
