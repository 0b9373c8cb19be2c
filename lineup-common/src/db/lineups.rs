//! Lineup queries

use super::models::{Lineup, NewLineup};
use crate::notify::NotificationRule;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use sqlx::{Row, SqlitePool};

/// Persist a lineup and its ordered breeds; returns the lineup id
pub async fn insert_lineup(pool: &SqlitePool, lineup: &NewLineup) -> Result<i64> {
    if lineup.breed_ids.is_empty() {
        return Err(Error::InvalidInput("A lineup needs at least one breed.".to_string()));
    }

    let mut tx = pool.begin().await?;

    let lineup_id = sqlx::query("INSERT INTO lineups (show_id, category_id) VALUES (?, ?)")
        .bind(lineup.show_id)
        .bind(lineup.category_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    for (position, breed_id) in lineup.breed_ids.iter().enumerate() {
        sqlx::query("INSERT INTO lineup_breeds (lineup_id, position, breed_id) VALUES (?, ?, ?)")
            .bind(lineup_id)
            .bind(position as i64)
            .bind(*breed_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(lineup_id)
}

/// All lineups in save order, breeds in lineup order
pub async fn list_lineups(pool: &SqlitePool) -> Result<Vec<Lineup>> {
    let rows = sqlx::query(
        r#"
        SELECT l.id, l.show_id, l.category_id, l.created_at, b.breed_name
        FROM lineups l
        LEFT JOIN lineup_breeds lb ON lb.lineup_id = l.id
        LEFT JOIN breeds b ON b.id = lb.breed_id
        ORDER BY l.id ASC, lb.position ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut lineups: Vec<Lineup> = Vec::new();

    for row in rows {
        let id: i64 = row.get("id");
        let breed: Option<String> = row.get("breed_name");

        match lineups.last_mut() {
            Some(last) if last.id == id => last.breeds.extend(breed),
            _ => lineups.push(Lineup {
                id,
                show_id: row.get("show_id"),
                category_id: row.get("category_id"),
                breeds: breed.into_iter().collect(),
                created_at: row.get::<NaiveDateTime, _>("created_at"),
            }),
        }
    }

    Ok(lineups)
}

/// One breed-call rule per breed in the lineup, in lineup order
pub async fn lineup_rules(pool: &SqlitePool, lineup_id: i64) -> Result<Vec<NotificationRule>> {
    let rows = sqlx::query(
        r#"
        SELECT b.breed_name, c.name AS category_name, sh.name AS show_name
        FROM lineups l
        JOIN lineup_breeds lb ON lb.lineup_id = l.id
        JOIN breeds b ON b.id = lb.breed_id
        JOIN categories c ON c.id = l.category_id
        JOIN shows sh ON sh.id = l.show_id
        WHERE l.id = ?
        ORDER BY lb.position ASC
        "#,
    )
    .bind(lineup_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| NotificationRule {
            breed: row.get("breed_name"),
            category: row.get("category_name"),
            show: row.get("show_name"),
        })
        .collect())
}

/// Remove every lineup; returns how many were deleted
pub async fn clear_lineups(pool: &SqlitePool) -> Result<u64> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM lineup_breeds")
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM lineups")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_database;
    use crate::db::reference::breed_id_by_name;

    async fn setup() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("lineup.db")).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn lineup_keeps_breed_order() {
        let (_dir, pool) = setup().await;
        let rex = breed_id_by_name(&pool, "Mini Rex").await.unwrap().unwrap();
        let holland = breed_id_by_name(&pool, "Holland Lop").await.unwrap().unwrap();

        let id = insert_lineup(&pool, &NewLineup::new(1, 1, [rex, holland]))
            .await
            .unwrap();

        let lineups = list_lineups(&pool).await.unwrap();
        assert_eq!(lineups.len(), 1);
        assert_eq!(lineups[0].id, id);
        assert_eq!(lineups[0].breeds, vec!["Mini Rex", "Holland Lop"]);

        let rules = lineup_rules(&pool, id).await.unwrap();
        assert_eq!(
            rules,
            vec![
                NotificationRule::new("Mini Rex", "Youth", "A"),
                NotificationRule::new("Holland Lop", "Youth", "A"),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_show_is_rejected() {
        let (_dir, pool) = setup().await;
        let rex = breed_id_by_name(&pool, "Mini Rex").await.unwrap().unwrap();

        let err = insert_lineup(&pool, &NewLineup::new(42, 1, [rex]))
            .await
            .unwrap_err();
        assert!(err.is_foreign_key_violation());
        assert!(list_lineups(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lineup_without_breeds_is_invalid_input() {
        let (_dir, pool) = setup().await;

        let err = insert_lineup(&pool, &NewLineup::new(1, 1, []))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(list_lineups(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let (_dir, pool) = setup().await;
        let rex = breed_id_by_name(&pool, "Mini Rex").await.unwrap().unwrap();

        insert_lineup(&pool, &NewLineup::new(1, 1, [rex])).await.unwrap();
        insert_lineup(&pool, &NewLineup::new(2, 2, [rex])).await.unwrap();

        assert_eq!(clear_lineups(&pool).await.unwrap(), 2);
        assert!(list_lineups(&pool).await.unwrap().is_empty());
    }
}
