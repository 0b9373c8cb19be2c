//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::notify::SubmissionEntry;

/// Row of the breed reference list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Breed {
    pub id: i64,
    pub breed_name: String,
}

/// Show category (Youth / Open)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Show ring. `name` is the short code exhibitors pick ("A"), `label` is what
/// the printed lineup shows ("Show A").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Show {
    pub id: i64,
    pub name: String,
    pub label: String,
}

/// One stored exhibitor selection (one breed per row)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Submission {
    pub id: i64,
    pub exhibitor_id: String,
    pub category_id: i64,
    pub show_id: i64,
    pub breed_id: i64,
    pub created_at: NaiveDateTime,
}

/// Validated submission ready to insert
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub exhibitor_id: String,
    pub category_id: i64,
    pub show_id: i64,
    /// Never empty; one row is written per breed
    pub breed_ids: Vec<i64>,
}

/// All of one exhibitor's selections, names resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitorSubmissions {
    pub exhibitor_id: String,
    pub submissions: Vec<SubmissionEntry>,
}

/// Validated lineup ready to insert
#[derive(Debug, Clone)]
pub struct NewLineup {
    pub show_id: i64,
    pub category_id: i64,
    /// Ordered, duplicates removed
    pub breed_ids: Vec<i64>,
}

impl NewLineup {
    /// Build a lineup, keeping the first occurrence of each breed
    pub fn new(show_id: i64, category_id: i64, breed_ids: impl IntoIterator<Item = i64>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let breed_ids = breed_ids.into_iter().filter(|id| seen.insert(*id)).collect();
        Self {
            show_id,
            category_id,
            breed_ids,
        }
    }
}

/// Saved lineup with breed names in lineup order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lineup {
    pub id: i64,
    pub show_id: i64,
    pub category_id: i64,
    pub breeds: Vec<String>,
    pub created_at: NaiveDateTime,
}
