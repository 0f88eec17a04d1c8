use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::{
    http::handlers::{
        create_poster_handler, create_review_handler, delete_review_handler,
        get_all_series_handler, get_movie_handler, get_movie_posters_handler,
        get_movie_reviews_handler, get_movies_handler, get_series_handler,
        get_series_posters_handler, get_series_reviews_handler, login_handler, logout_handler,
        register_handler, update_review_handler,
    },
    middleware::{create_auth_rate_limiter, rate_limit_middleware},
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    let auth_rate_limiter = create_auth_rate_limiter();

    let auth_routes = Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(auth_rate_limiter.clone(), req, next)
        }));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/reviews", post(create_review_handler))
        .route("/api/reviews/movies/{movie_id}", get(get_movie_reviews_handler))
        .route("/api/reviews/series/{series_id}", get(get_series_reviews_handler))
        .route(
            "/api/reviews/{id}",
            put(update_review_handler).delete(delete_review_handler),
        )
        .route("/api/movies", get(get_movies_handler))
        .route("/api/movies/{movie_id}", get(get_movie_handler))
        .route("/api/series", get(get_all_series_handler))
        .route("/api/series/{series_id}", get(get_series_handler))
        .route("/api/posters", post(create_poster_handler))
        .route("/api/posters/movies/{movie_id}", get(get_movie_posters_handler))
        .route("/api/posters/series/{series_id}", get(get_series_posters_handler))
        .merge(auth_routes)
        .with_state(state)
}
