use crate::{
    errors::AppError,
    models::{Movie, Series, catalog::CatalogQuery},
    state::SharedStore,
};

pub async fn list_movies(query: &CatalogQuery, store: SharedStore) -> Result<Vec<Movie>, AppError> {
    store.list_movies(query).await
}

pub async fn get_movie(movie_id: i32, store: SharedStore) -> Result<Movie, AppError> {
    store
        .find_movie(movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".into()))
}

pub async fn list_series(query: &CatalogQuery, store: SharedStore) -> Result<Vec<Series>, AppError> {
    store.list_series(query).await
}

pub async fn get_series(series_id: i32, store: SharedStore) -> Result<Series, AppError> {
    store
        .find_series(series_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Series not found".into()))
}
