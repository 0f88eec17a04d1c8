pub mod auth;
pub mod catalog;
pub mod poster;
pub mod review;

pub use auth::{login_handler, logout_handler, register_handler};
pub use catalog::{get_all_series_handler, get_movie_handler, get_movies_handler, get_series_handler};
pub use poster::{create_poster_handler, get_movie_posters_handler, get_series_posters_handler};
pub use review::{
    create_review_handler, delete_review_handler, get_movie_reviews_handler,
    get_series_reviews_handler, update_review_handler,
};
