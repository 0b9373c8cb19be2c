//! Reference data: breeds, categories and shows
//!
//! Categories and shows are a fixed enumeration; the breed list is seeded on
//! first start and may be extended directly in the database.

use super::models::{Breed, Category, Show};
use crate::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Fixed show categories (id, name)
pub const CATEGORIES: &[(i64, &str)] = &[(1, "Youth"), (2, "Open")];

/// Fixed shows (id, name, label)
pub const SHOWS: &[(i64, &str, &str)] = &[
    (1, "A", "Show A"),
    (2, "B", "Show B"),
    (3, "C", "Show C"),
    (4, "D", "Show D"),
    (5, "Meat Pen", "Meat Pen"),
    (6, "Fur", "Fur"),
];

/// Rabbit breeds seeded into a new database
pub const DEFAULT_BREEDS: &[&str] = &[
    "American",
    "American Chinchilla",
    "American Fuzzy Lop",
    "American Sable",
    "Argente Brun",
    "Belgian Hare",
    "Beveren",
    "Blanc de Hotot",
    "Britannia Petite",
    "Californian",
    "Champagne d'Argent",
    "Checkered Giant",
    "Cinnamon",
    "Creme d'Argent",
    "Czech Frosty",
    "Dutch",
    "Dwarf Hotot",
    "Dwarf Papillon",
    "English Angora",
    "English Lop",
    "English Spot",
    "Flemish Giant",
    "Florida White",
    "French Angora",
    "French Lop",
    "Giant Angora",
    "Giant Chinchilla",
    "Harlequin",
    "Havana",
    "Himalayan",
    "Holland Lop",
    "Jersey Wooly",
    "Lilac",
    "Lionhead",
    "Mini Lop",
    "Mini Rex",
    "Mini Satin",
    "Netherland Dwarf",
    "New Zealand",
    "Palomino",
    "Polish",
    "Rex",
    "Rhinelander",
    "Satin",
    "Satin Angora",
    "Silver",
    "Silver Fox",
    "Silver Marten",
    "Standard Chinchilla",
    "Tan",
    "Thrianta",
];

/// Insert any missing reference rows (idempotent)
pub async fn seed_reference_data(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    for (id, name) in CATEGORIES {
        sqlx::query("INSERT OR IGNORE INTO categories (id, name) VALUES (?, ?)")
            .bind(*id)
            .bind(*name)
            .execute(&mut *tx)
            .await?;
    }

    for (id, name, label) in SHOWS {
        sqlx::query("INSERT OR IGNORE INTO shows (id, name, label) VALUES (?, ?, ?)")
            .bind(*id)
            .bind(*name)
            .bind(*label)
            .execute(&mut *tx)
            .await?;
    }

    for breed in DEFAULT_BREEDS {
        sqlx::query("INSERT OR IGNORE INTO breeds (breed_name) VALUES (?)")
            .bind(*breed)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    debug!("Reference data seeded");

    Ok(())
}

/// All breeds ordered by name
pub async fn list_breeds(pool: &SqlitePool) -> Result<Vec<Breed>> {
    let breeds = sqlx::query_as::<_, Breed>(
        "SELECT id, breed_name FROM breeds ORDER BY breed_name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(breeds)
}

pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(categories)
}

pub async fn list_shows(pool: &SqlitePool) -> Result<Vec<Show>> {
    let shows = sqlx::query_as::<_, Show>("SELECT id, name, label FROM shows ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(shows)
}

/// Look up a breed id by exact name
pub async fn breed_id_by_name(pool: &SqlitePool, breed_name: &str) -> Result<Option<i64>> {
    let id = sqlx::query_scalar("SELECT id FROM breeds WHERE breed_name = ?")
        .bind(breed_name)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_database;

    #[tokio::test]
    async fn seeds_fixed_enumerations() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("lineup.db")).await.unwrap();

        let categories = list_categories(&pool).await.unwrap();
        assert_eq!(
            categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["Youth", "Open"]
        );

        let shows = list_shows(&pool).await.unwrap();
        assert_eq!(shows.len(), 6);
        assert_eq!(shows[0].name, "A");
        assert_eq!(shows[0].label, "Show A");
        assert_eq!(shows[4].label, "Meat Pen");
    }

    #[tokio::test]
    async fn breeds_are_sorted_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("lineup.db")).await.unwrap();

        // Seeding twice must not duplicate rows
        seed_reference_data(&pool).await.unwrap();

        let breeds = list_breeds(&pool).await.unwrap();
        assert_eq!(breeds.len(), DEFAULT_BREEDS.len());
        for pair in breeds.windows(2) {
            assert!(pair[0].breed_name <= pair[1].breed_name);
        }

        let holland = breed_id_by_name(&pool, "Holland Lop").await.unwrap();
        assert!(holland.is_some());
        assert!(breed_id_by_name(&pool, "Jackalope").await.unwrap().is_none());
    }
}
