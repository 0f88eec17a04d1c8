use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    auth::AuthClaims,
    db::poster::{create_poster, list_posters_for_subject},
    http::extract::ValidatedJson,
    models::{
        Subject,
        poster::{PosterCreate, PosterView},
    },
    state::AppState,
};

pub async fn get_movie_posters_handler(
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> Result<Json<Vec<PosterView>>, (StatusCode, String)> {
    list_posters_for_subject(Subject::Movie(movie_id), state.store.clone())
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn get_series_posters_handler(
    State(state): State<AppState>,
    Path(series_id): Path<i32>,
) -> Result<Json<Vec<PosterView>>, (StatusCode, String)> {
    list_posters_for_subject(Subject::Series(series_id), state.store.clone())
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn create_poster_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    ValidatedJson(payload): ValidatedJson<PosterCreate>,
) -> Result<(StatusCode, Json<PosterView>), (StatusCode, String)> {
    let actor = claims.actor()?;

    let poster = create_poster(
        actor,
        payload.subject,
        &payload.url,
        &payload.mime_type,
        state.store.clone(),
    )
    .await
    .map_err(|err| {
        tracing::warn!("Error creating poster: {}", err);
        err.to_response()
    })?;

    Ok((StatusCode::CREATED, Json(poster)))
}
