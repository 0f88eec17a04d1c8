use std::fmt;

use serde::Deserialize;

use crate::errors::AppError;

/// The movie or series a review or poster is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Movie(i32),
    Series(i32),
}

impl Subject {
    /// Builds a subject from the nullable column pair used by the storage rows.
    /// Exactly one side must be set.
    pub fn from_columns(movie_id: Option<i32>, series_id: Option<i32>) -> Result<Self, AppError> {
        match (movie_id, series_id) {
            (Some(id), None) => Ok(Subject::Movie(id)),
            (None, Some(id)) => Ok(Subject::Series(id)),
            (Some(_), Some(_)) => Err(AppError::BadRequest(
                "Specify either movieId or seriesId, not both".into(),
            )),
            (None, None) => Err(AppError::BadRequest(
                "Either movieId or seriesId must be provided".into(),
            )),
        }
    }

    pub fn columns(&self) -> (Option<i32>, Option<i32>) {
        match *self {
            Subject::Movie(id) => (Some(id), None),
            Subject::Series(id) => (None, Some(id)),
        }
    }

    pub fn id(&self) -> i32 {
        match *self {
            Subject::Movie(id) | Subject::Series(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Subject::Movie(_) => "movie",
            Subject::Series(_) => "series",
        }
    }

    pub fn not_found(&self) -> AppError {
        match self {
            Subject::Movie(_) => AppError::NotFound("Movie not found".into()),
            Subject::Series(_) => AppError::NotFound("Series not found".into()),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// Raw subject reference as it arrives in request bodies.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    pub movie_id: Option<i32>,
    pub series_id: Option<i32>,
}

impl TryFrom<SubjectRef> for Subject {
    type Error = AppError;

    fn try_from(value: SubjectRef) -> Result<Self, Self::Error> {
        Subject::from_columns(value.movie_id, value.series_id)
    }
}
