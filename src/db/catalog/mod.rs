pub mod get;

pub use get::{get_movie, get_series, list_movies, list_series};
