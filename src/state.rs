use std::sync::Arc;

use crate::{auth::JwtKeys, store::CinemaStore};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(store: SharedStore, jwt: JwtKeys) -> Self {
        Self { store, jwt }
    }
}

pub type SharedStore = Arc<dyn CinemaStore>;
