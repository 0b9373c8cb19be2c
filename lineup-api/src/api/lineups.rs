//! Organizer lineups
//!
//! Saving a lineup is what calls breeds to the table: every saved breed is
//! matched against current submissions and each hit is published as a
//! `BreedCalled` event.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use lineup_common::db::{lineups, reference, submissions, Lineup, NewLineup};
use lineup_common::events::LineupEvent;
use lineup_common::notify::{find_matches, MatcherConfig};
use lineup_common::print::format_lineups;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{ApiError, AppState};

pub const LINEUP_INCOMPLETE_MESSAGE: &str =
    "Please select a category, show, and at least one breed.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineupRequest {
    #[serde(default)]
    pub show_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub breed_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateLineupResponse {
    pub message: String,
    #[serde(rename = "lineupId")]
    pub lineup_id: i64,
    /// Number of breed calls published
    pub notified: usize,
}

/// POST /api/lineups
pub async fn create_lineup(
    State(state): State<AppState>,
    payload: Result<Json<CreateLineupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateLineupResponse>), ApiError> {
    let Json(request) = payload?;
    let lineup = validate_lineup(request)?;

    let lineup_id = lineups::insert_lineup(&state.db, &lineup).await?;
    info!(
        lineup_id,
        category_id = lineup.category_id,
        show_id = lineup.show_id,
        breeds = lineup.breed_ids.len(),
        "Lineup saved"
    );

    let rules = lineups::lineup_rules(&state.db, lineup_id).await?;
    let entries = submissions::list_submission_entries(&state.db).await?;
    let breeds: Vec<String> = rules.iter().map(|r| r.breed.clone()).collect();

    let matches = find_matches(&MatcherConfig::new(rules), &entries);
    for m in &matches {
        debug!(breed = %m.rule.breed, exhibitor = %m.exhibitor_id, "Calling breed");
        state.events.emit_lossy(LineupEvent::BreedCalled {
            lineup_id,
            breed: m.rule.breed.clone(),
            category: m.rule.category.clone(),
            show: m.rule.show.clone(),
            exhibitor_id: m.exhibitor_id.clone(),
            timestamp: Utc::now(),
        });
    }

    state.events.emit_lossy(LineupEvent::LineupSaved {
        lineup_id,
        category_id: lineup.category_id,
        show_id: lineup.show_id,
        breeds,
        timestamp: Utc::now(),
    });

    Ok((
        StatusCode::CREATED,
        Json(CreateLineupResponse {
            message: "Lineup saved successfully!".to_string(),
            lineup_id,
            notified: matches.len(),
        }),
    ))
}

/// GET /api/lineups
pub async fn list_lineups(State(state): State<AppState>) -> Result<Json<Vec<Lineup>>, ApiError> {
    Ok(Json(lineups::list_lineups(&state.db).await?))
}

/// GET /api/lineups/print
pub async fn print_lineups(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let saved = lineups::list_lineups(&state.db).await?;
    let categories = reference::list_categories(&state.db).await?;
    let shows = reference::list_shows(&state.db).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format_lineups(&saved, &categories, &shows),
    ))
}

/// DELETE /api/lineups
pub async fn clear_lineups(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let removed = lineups::clear_lineups(&state.db).await?;
    info!("Cleared {} lineups", removed);

    state.events.emit_lossy(LineupEvent::LineupsCleared { timestamp: Utc::now() });
    Ok(StatusCode::NO_CONTENT)
}

pub fn validate_lineup(request: CreateLineupRequest) -> Result<NewLineup, ApiError> {
    let incomplete = || ApiError::BadRequest(LINEUP_INCOMPLETE_MESSAGE.to_string());

    let show_id = request.show_id.filter(|id| *id > 0).ok_or_else(incomplete)?;
    let category_id = request.category_id.filter(|id| *id > 0).ok_or_else(incomplete)?;
    if request.breed_ids.is_empty() {
        return Err(incomplete());
    }

    Ok(NewLineup::new(show_id, category_id, request.breed_ids))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lineup_needs_show_category_and_breeds() {
        let cases = [
            CreateLineupRequest { show_id: None, category_id: Some(1), breed_ids: vec![1] },
            CreateLineupRequest { show_id: Some(1), category_id: Some(0), breed_ids: vec![1] },
            CreateLineupRequest { show_id: Some(1), category_id: Some(1), breed_ids: vec![] },
        ];

        for request in cases {
            match validate_lineup(request) {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, LINEUP_INCOMPLETE_MESSAGE),
                other => panic!("expected 400, got {:?}", other.map(|l| l.breed_ids)),
            }
        }
    }

    #[test]
    fn duplicate_breeds_keep_first_position() {
        let lineup = validate_lineup(CreateLineupRequest {
            show_id: Some(2),
            category_id: Some(1),
            breed_ids: vec![7, 3, 7],
        })
        .unwrap();
        assert_eq!(lineup.breed_ids, vec![7, 3]);
    }
}
