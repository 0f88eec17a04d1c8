use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    db::catalog::{get_movie, get_series, list_movies, list_series},
    models::{Movie, Series, catalog::CatalogQuery},
    state::AppState,
};

pub async fn get_movies_handler(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Movie>>, (StatusCode, String)> {
    list_movies(&query, state.store.clone())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing movies: {}", e);
            e.to_response()
        })
}

pub async fn get_movie_handler(
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> Result<Json<Movie>, (StatusCode, String)> {
    get_movie(movie_id, state.store.clone())
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

pub async fn get_all_series_handler(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Series>>, (StatusCode, String)> {
    list_series(&query, state.store.clone())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing series: {}", e);
            e.to_response()
        })
}

pub async fn get_series_handler(
    State(state): State<AppState>,
    Path(series_id): Path<i32>,
) -> Result<Json<Series>, (StatusCode, String)> {
    get_series(series_id, state.store.clone())
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}
