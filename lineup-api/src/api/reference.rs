//! Reference data endpoints (breeds, categories, shows)

use axum::{extract::State, Json};
use lineup_common::db::{reference, Breed, Category, Show};

use crate::{ApiError, AppState};

/// GET /api/breeds
pub async fn list_breeds(State(state): State<AppState>) -> Result<Json<Vec<Breed>>, ApiError> {
    Ok(Json(reference::list_breeds(&state.db).await?))
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(reference::list_categories(&state.db).await?))
}

/// GET /api/shows
pub async fn list_shows(State(state): State<AppState>) -> Result<Json<Vec<Show>>, ApiError> {
    Ok(Json(reference::list_shows(&state.db).await?))
}
