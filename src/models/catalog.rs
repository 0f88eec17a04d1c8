use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub director: String,
    pub genre: String,
    pub box_office: Option<f64>,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: i32,
    pub title: String,
    pub genre: String,
    pub average_rating: f64,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub director: String,
    pub genre: String,
    pub box_office: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewSeries {
    pub title: String,
    pub genre: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSort {
    #[default]
    Title,
    Rating,
    Newest,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub genre: Option<String>,
    #[serde(default)]
    pub sort: CatalogSort,
}

impl CatalogQuery {
    /// Genre filter with surrounding whitespace removed; blank means no filter.
    pub fn genre_filter(&self) -> Option<&str> {
        self.genre
            .as_deref()
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
    }
}
