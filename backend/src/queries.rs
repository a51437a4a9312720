use sqlx::SqlitePool;
use shared::models::VoteOption;

pub struct Queries;

impl Queries {
    pub async fn list_options(pool: &SqlitePool) -> Result<Vec<VoteOption>, sqlx::Error> {
        sqlx::query_as::<_, VoteOption>(
            "SELECT id, title, votes FROM vote_options ORDER BY id"
        )
        .fetch_all(pool)
        .await
    }

    /// Single-statement increment; SQLite serializes writers so concurrent
    /// calls never lose an update. `None` when no row has that id.
    pub async fn increment_votes(pool: &SqlitePool, id: i64) -> Result<Option<VoteOption>, sqlx::Error> {
        sqlx::query_as::<_, VoteOption>(
            "UPDATE vote_options SET votes = votes + 1
             WHERE id = ?
             RETURNING id, title, votes"
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Inserts missing titles in order inside one transaction and returns how
    /// many were new.
    pub async fn seed_options(pool: &SqlitePool, titles: &[String]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for title in titles {
            let result = sqlx::query(
                "INSERT INTO vote_options (title, votes) VALUES (?, 0)
                 ON CONFLICT(title) DO NOTHING"
            )
            .bind(title)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
