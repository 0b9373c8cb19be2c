//! Submission API
//!
//! - `GET  /api/submissions` lists every stored row
//! - `GET  /api/submissions/match` finds exhibitors for a category/show/breed
//! - `POST /api/submissions` stores an exhibitor's selection
//! - `GET  /api/exhibitors` groups submissions per exhibitor for the notifier

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use lineup_common::db::{submissions, ExhibitorSubmissions, NewSubmission, Submission};
use lineup_common::events::LineupEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::{ApiError, AppState};

/// Query string of the match endpoint; everything arrives as text
#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    pub category_id: Option<String>,
    pub show_id: Option<String>,
    pub breed_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchRow {
    pub exhibitor_id: String,
}

/// Body of POST /api/submissions
///
/// Fields are loosely typed so that absent, null and malformed values can all
/// be reported as a 400 instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSubmissionRequest {
    #[serde(default)]
    pub exhibitor_id: Option<Value>,
    #[serde(default)]
    pub category_id: Option<Value>,
    #[serde(default)]
    pub show_id: Option<Value>,
    /// One breed id or a list of them
    #[serde(default)]
    pub breed_id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CreateSubmissionResponse {
    pub message: String,
    #[serde(rename = "submissionId")]
    pub submission_id: i64,
    #[serde(rename = "submissionIds", skip_serializing_if = "Option::is_none")]
    pub submission_ids: Option<Vec<i64>>,
}

/// GET /api/submissions
pub async fn list_submissions(State(state): State<AppState>) -> Result<Json<Vec<Submission>>, ApiError> {
    let rows = submissions::list_submissions(&state.db).await?;
    debug!("Listing {} submissions", rows.len());
    Ok(Json(rows))
}

/// GET /api/submissions/match?category_id&show_id&breed_id
pub async fn match_submissions(
    State(state): State<AppState>,
    query: Result<Query<MatchQuery>, QueryRejection>,
) -> Result<Json<Vec<MatchRow>>, ApiError> {
    let Query(query) = query?;
    let category_id = parse_query_id("category_id", query.category_id.as_deref())?;
    let show_id = parse_query_id("show_id", query.show_id.as_deref())?;
    let breed_id = parse_query_id("breed_id", query.breed_id.as_deref())?;

    // No rows is Error::NotFound, which maps to 404
    let exhibitors =
        submissions::find_matching_exhibitors(&state.db, category_id, show_id, breed_id).await?;

    Ok(Json(
        exhibitors
            .into_iter()
            .map(|exhibitor_id| MatchRow { exhibitor_id })
            .collect(),
    ))
}

/// POST /api/submissions
pub async fn create_submission(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubmissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateSubmissionResponse>), ApiError> {
    let Json(request) = payload?;
    let submission = validate_submission(request)?;

    let ids = submissions::insert_submission(&state.db, &submission).await?;
    info!(
        exhibitor = %submission.exhibitor_id,
        category_id = submission.category_id,
        show_id = submission.show_id,
        breeds = ids.len(),
        "Submission added"
    );

    state.events.emit_lossy(LineupEvent::SubmissionCreated {
        submission_ids: ids.clone(),
        exhibitor_id: submission.exhibitor_id.clone(),
        category_id: submission.category_id,
        show_id: submission.show_id,
        timestamp: Utc::now(),
    });

    let submission_id = ids
        .first()
        .copied()
        .ok_or_else(|| ApiError::Internal("insert returned no ids".to_string()))?;
    let submission_ids = (ids.len() > 1).then(|| ids.clone());
    Ok((
        StatusCode::CREATED,
        Json(CreateSubmissionResponse {
            message: "Submission added successfully!".to_string(),
            submission_id,
            submission_ids,
        }),
    ))
}

/// GET /api/exhibitors
pub async fn list_exhibitors(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExhibitorSubmissions>>, ApiError> {
    Ok(Json(submissions::list_exhibitors(&state.db).await?))
}

/// Turn a request body into a submission, or a 400
///
/// Zero, empty strings and null count as absent.
pub fn validate_submission(request: CreateSubmissionRequest) -> Result<NewSubmission, ApiError> {
    let exhibitor_id = request
        .exhibitor_id
        .as_ref()
        .and_then(exhibitor_text)
        .ok_or_else(ApiError::missing_fields)?;
    let category_id = required_id("category_id", request.category_id.as_ref())?;
    let show_id = required_id("show_id", request.show_id.as_ref())?;

    let breed_ids = match request.breed_id.as_ref() {
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(|item| required_id("breed_id", Some(item)))
            .collect::<Result<Vec<_>, _>>()?,
        Some(Value::Array(_)) => return Err(ApiError::missing_fields()),
        other => vec![required_id("breed_id", other)?],
    };

    Ok(NewSubmission {
        exhibitor_id,
        category_id,
        show_id,
        breed_ids,
    })
}

fn exhibitor_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Positive integer id from a JSON number or numeric string
fn required_id(field: &str, value: Option<&Value>) -> Result<i64, ApiError> {
    let id = match value {
        None | Some(Value::Null) => return Err(ApiError::missing_fields()),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(ApiError::missing_fields()),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    match id {
        Some(0) => Err(ApiError::missing_fields()),
        Some(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest(format!("{} must be a positive integer.", field))),
    }
}

fn parse_query_id(field: &str, value: Option<&str>) -> Result<i64, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Err(ApiError::missing_fields()),
        Some(text) => {
            let value = Value::String(text.to_string());
            required_id(field, Some(&value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> CreateSubmissionRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let submission = validate_submission(request(json!({
            "exhibitor_id": 12,
            "category_id": "1",
            "show_id": 2,
            "breed_id": "31"
        })))
        .unwrap();

        assert_eq!(submission.exhibitor_id, "12");
        assert_eq!(submission.category_id, 1);
        assert_eq!(submission.show_id, 2);
        assert_eq!(submission.breed_ids, vec![31]);
    }

    #[test]
    fn accepts_breed_list() {
        let submission = validate_submission(request(json!({
            "exhibitor_id": "ex-1",
            "category_id": 1,
            "show_id": 1,
            "breed_id": [3, 4]
        })))
        .unwrap();
        assert_eq!(submission.breed_ids, vec![3, 4]);
    }

    #[test]
    fn every_missing_field_is_rejected() {
        let full = json!({
            "exhibitor_id": "ex-1",
            "category_id": 1,
            "show_id": 1,
            "breed_id": 3
        });

        for field in ["exhibitor_id", "category_id", "show_id", "breed_id"] {
            let mut body = full.clone();
            body.as_object_mut().unwrap().remove(field);
            assert!(
                matches!(validate_submission(request(body)), Err(ApiError::BadRequest(_))),
                "missing {} should be rejected",
                field
            );
        }
    }

    #[test]
    fn falsy_values_count_as_missing() {
        for (field, value) in [
            ("exhibitor_id", json!("")),
            ("exhibitor_id", json!(0)),
            ("exhibitor_id", json!(0.0)),
            ("category_id", json!(0)),
            ("show_id", Value::Null),
            ("breed_id", json!([])),
        ] {
            let mut body = json!({
                "exhibitor_id": "ex-1",
                "category_id": 1,
                "show_id": 1,
                "breed_id": 3
            });
            body[field] = value;
            match validate_submission(request(body)) {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "All fields are required."),
                other => panic!("{} should be missing, got {:?}", field, other.map(|s| s.breed_ids)),
            }
        }
    }

    #[test]
    fn malformed_ids_are_rejected() {
        let result = validate_submission(request(json!({
            "exhibitor_id": "ex-1",
            "category_id": "youth",
            "show_id": 1,
            "breed_id": 3
        })));
        match result {
            Err(ApiError::BadRequest(msg)) => assert!(msg.contains("category_id")),
            other => panic!("unexpected: {:?}", other.map(|s| s.category_id)),
        }
    }

    #[test]
    fn query_ids_must_be_present() {
        assert!(parse_query_id("show_id", None).is_err());
        assert!(parse_query_id("show_id", Some("  ")).is_err());
        assert_eq!(parse_query_id("show_id", Some("4")).unwrap(), 4);
    }
}
