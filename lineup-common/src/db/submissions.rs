//! Submission queries
//!
//! Submissions are append-only: rows are inserted on exhibitor save and never
//! updated in place.

use super::models::{ExhibitorSubmissions, NewSubmission, Submission};
use crate::notify::SubmissionEntry;
use crate::{Error, Result};
use sqlx::{Row, SqlitePool};

/// All submission rows in insertion order
pub async fn list_submissions(pool: &SqlitePool) -> Result<Vec<Submission>> {
    let rows = sqlx::query_as::<_, Submission>(
        r#"
        SELECT id, exhibitor_id, category_id, show_id, breed_id, created_at
        FROM submissions
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Exhibitors who entered `breed_id` for the given category and show
///
/// Returns `Error::NotFound` when nobody did.
pub async fn find_matching_exhibitors(
    pool: &SqlitePool,
    category_id: i64,
    show_id: i64,
    breed_id: i64,
) -> Result<Vec<String>> {
    let exhibitors = sqlx::query_scalar(
        r#"
        SELECT exhibitor_id
        FROM submissions
        WHERE category_id = ? AND show_id = ? AND breed_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(category_id)
    .bind(show_id)
    .bind(breed_id)
    .fetch_all(pool)
    .await?;

    if exhibitors.is_empty() {
        return Err(Error::NotFound("No matching exhibitors found.".to_string()));
    }

    Ok(exhibitors)
}

/// Insert one row per breed and return the generated ids in breed order
///
/// A single breed is one statement; several breeds are written in one
/// transaction so a bad breed id leaves nothing behind.
pub async fn insert_submission(pool: &SqlitePool, submission: &NewSubmission) -> Result<Vec<i64>> {
    const INSERT: &str =
        "INSERT INTO submissions (exhibitor_id, category_id, show_id, breed_id) VALUES (?, ?, ?, ?)";

    if submission.breed_ids.is_empty() {
        return Err(Error::InvalidInput("At least one breed is required.".to_string()));
    }

    if let [breed_id] = submission.breed_ids.as_slice() {
        let id = sqlx::query(INSERT)
            .bind(&submission.exhibitor_id)
            .bind(submission.category_id)
            .bind(submission.show_id)
            .bind(*breed_id)
            .execute(pool)
            .await?
            .last_insert_rowid();
        return Ok(vec![id]);
    }

    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(submission.breed_ids.len());

    for breed_id in &submission.breed_ids {
        let id = sqlx::query(INSERT)
            .bind(&submission.exhibitor_id)
            .bind(submission.category_id)
            .bind(submission.show_id)
            .bind(*breed_id)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        ids.push(id);
    }

    tx.commit().await?;
    Ok(ids)
}

pub async fn count_submissions(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Submissions grouped per (exhibitor, category, show) with names resolved
///
/// This is the view the notification matcher works on.
pub async fn list_submission_entries(pool: &SqlitePool) -> Result<Vec<SubmissionEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.exhibitor_id, c.name AS category_name, sh.name AS show_name, b.breed_name
        FROM submissions s
        JOIN categories c ON c.id = s.category_id
        JOIN shows sh ON sh.id = s.show_id
        JOIN breeds b ON b.id = s.breed_id
        ORDER BY s.exhibitor_id ASC, s.category_id ASC, s.show_id ASC, s.id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut entries: Vec<SubmissionEntry> = Vec::new();

    for row in rows {
        let id: i64 = row.get("id");
        let exhibitor_id: String = row.get("exhibitor_id");
        let category: String = row.get("category_name");
        let show: String = row.get("show_name");
        let breed: String = row.get("breed_name");

        match entries.last_mut() {
            Some(last)
                if last.exhibitor_id == exhibitor_id
                    && last.category == category
                    && last.show == show =>
            {
                if !last.breeds.contains(&breed) {
                    last.breeds.push(breed);
                }
            }
            _ => entries.push(SubmissionEntry {
                submission_id: id,
                exhibitor_id,
                category,
                show,
                breeds: vec![breed],
            }),
        }
    }

    Ok(entries)
}

/// Submission entries grouped per exhibitor
pub async fn list_exhibitors(pool: &SqlitePool) -> Result<Vec<ExhibitorSubmissions>> {
    let entries = list_submission_entries(pool).await?;
    let mut exhibitors: Vec<ExhibitorSubmissions> = Vec::new();

    for entry in entries {
        match exhibitors.last_mut() {
            Some(last) if last.exhibitor_id == entry.exhibitor_id => last.submissions.push(entry),
            _ => exhibitors.push(ExhibitorSubmissions {
                exhibitor_id: entry.exhibitor_id.clone(),
                submissions: vec![entry],
            }),
        }
    }

    Ok(exhibitors)
}
