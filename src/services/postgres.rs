use crate::core::seed::PairKey;
use crate::models::{ChatMessage, MatchRecord, Method, UserAttributes};
use crate::services::store::{LikeResult, MatchStore, ProfileStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;

/// Connect a shared pool and run pending migrations
pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(min_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// PostgreSQL-backed match and message store
///
/// The like transition takes a row lock on the pair so concurrent likes
/// serialize: exactly one observes "no record" and becomes the initiator,
/// and exactly one reverse like performs the upgrade to mutual.
pub struct PostgresMatchStore {
    pool: PgPool,
}

impl PostgresMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &PgRow) -> MatchRecord {
    MatchRecord {
        pair_lo: row.get("pair_lo"),
        pair_hi: row.get("pair_hi"),
        initiator: row.get("initiator"),
        mutual: row.get("mutual"),
        unlocked: row.get("unlocked"),
        accepted_lo: row.get("accepted_lo"),
        accepted_hi: row.get("accepted_hi"),
        created_at: row.get("created_at"),
    }
}

fn message_from_row(row: &PgRow) -> ChatMessage {
    ChatMessage {
        id: row.get("id"),
        pair_lo: row.get("pair_lo"),
        pair_hi: row.get("pair_hi"),
        sender: row.get("sender"),
        body: row.get("body"),
        sent_at: row.get("sent_at"),
    }
}

const SELECT_PAIR: &str = r#"
    SELECT pair_lo, pair_hi, initiator, mutual, unlocked,
           accepted_lo, accepted_hi, created_at
    FROM matches
    WHERE pair_lo = $1 AND pair_hi = $2
"#;

const SELECT_PAIR_FOR_UPDATE: &str = r#"
    SELECT pair_lo, pair_hi, initiator, mutual, unlocked,
           accepted_lo, accepted_hi, created_at
    FROM matches
    WHERE pair_lo = $1 AND pair_hi = $2
    FOR UPDATE
"#;

#[async_trait]
impl MatchStore for PostgresMatchStore {
    async fn like(&self, key: &PairKey, initiator: &str) -> Result<LikeResult, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Ensure the pair row exists, then take the row lock. Two concurrent
        // first likes both pass the insert (one wins, one no-ops) and then
        // serialize on the lock, so exactly one observes the reverse like.
        sqlx::query(
            r#"
            INSERT INTO matches (pair_lo, pair_hi, initiator)
            VALUES ($1, $2, $3)
            ON CONFLICT (pair_lo, pair_hi) DO NOTHING
            "#,
        )
        .bind(&key.lo)
        .bind(&key.hi)
        .bind(initiator)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(SELECT_PAIR_FOR_UPDATE)
            .bind(&key.lo)
            .bind(&key.hi)
            .fetch_one(&mut *tx)
            .await?;
        let record = record_from_row(&row);

        let result = if record.mutual || record.initiator == initiator {
            // Fresh like or duplicate; either way no transition to make
            LikeResult {
                record,
                newly_mutual: false,
            }
        } else {
            let row = sqlx::query(
                r#"
                UPDATE matches SET mutual = TRUE
                WHERE pair_lo = $1 AND pair_hi = $2
                RETURNING pair_lo, pair_hi, initiator, mutual, unlocked,
                          accepted_lo, accepted_hi, created_at
                "#,
            )
            .bind(&key.lo)
            .bind(&key.hi)
            .fetch_one(&mut *tx)
            .await?;

            LikeResult {
                record: record_from_row(&row),
                newly_mutual: true,
            }
        };

        tx.commit().await?;

        tracing::debug!(
            "Recorded like: {} -> pair ({}, {}), mutual={}",
            initiator,
            key.lo,
            key.hi,
            result.record.mutual
        );

        Ok(result)
    }

    async fn get(&self, key: &PairKey) -> Result<Option<MatchRecord>, StoreError> {
        let row = sqlx::query(SELECT_PAIR)
            .bind(&key.lo)
            .bind(&key.hi)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn accept(&self, key: &PairKey, user: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE matches
            SET accepted_lo = accepted_lo OR (pair_lo = $3),
                accepted_hi = accepted_hi OR (pair_hi = $3)
            WHERE pair_lo = $1 AND pair_hi = $2
            "#,
        )
        .bind(&key.lo)
        .bind(&key.hi)
        .bind(user)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("pair ({}, {})", key.lo, key.hi)));
        }

        Ok(())
    }

    async fn set_unlocked(&self, key: &PairKey) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE matches SET unlocked = TRUE WHERE pair_lo = $1 AND pair_hi = $2",
        )
        .bind(&key.lo)
        .bind(&key.hi)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("pair ({}, {})", key.lo, key.hi)));
        }

        Ok(())
    }

    async fn accepted_count(&self, user: &str) -> Result<u32, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS accepted
            FROM matches
            WHERE mutual
              AND ((pair_lo = $1 AND accepted_lo) OR (pair_hi = $1 AND accepted_hi))
            "#,
        )
        .bind(user)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.get("accepted");
        Ok(count as u32)
    }

    async fn dissolve(&self, key: &PairKey) -> Result<(), StoreError> {
        // Messages cascade with the record; nothing of the bond survives
        sqlx::query("DELETE FROM matches WHERE pair_lo = $1 AND pair_hi = $2")
            .bind(&key.lo)
            .bind(&key.hi)
            .execute(&self.pool)
            .await?;

        tracing::info!("Dissolved match ({}, {})", key.lo, key.hi);

        Ok(())
    }

    async fn insert_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, pair_lo, pair_hi, sender, body, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(&message.pair_lo)
        .bind(&message.pair_hi)
        .bind(&message.sender)
        .bind(&message.body)
        .bind(message.sent_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn history(&self, key: &PairKey) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, pair_lo, pair_hi, sender, body, sent_at
            FROM messages
            WHERE pair_lo = $1 AND pair_hi = $2
            ORDER BY sent_at ASC
            "#,
        )
        .bind(&key.lo)
        .bind(&key.hi)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// PostgreSQL-backed profile attribute reader
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn attributes_from_row(row: &PgRow) -> Result<UserAttributes, sqlx::Error> {
    let Json(methods): Json<Vec<Method>> = row.try_get("methods")?;
    Ok(UserAttributes {
        birth_date: row.try_get("birth_date")?,
        palm_signature: row.try_get("palm_signature")?,
        legal_name: row.try_get("legal_name")?,
        birth_time: row.try_get("birth_time")?,
        birth_place: row.try_get("birth_place")?,
        methods,
    })
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn get(&self, identity: &str) -> Result<Option<UserAttributes>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT birth_date, palm_signature, legal_name, birth_time, birth_place, methods
            FROM profiles
            WHERE identity = $1
            "#,
        )
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(attributes_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_candidates(
        &self,
        exclude: &str,
    ) -> Result<Vec<(String, UserAttributes)>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT identity, birth_date, palm_signature, legal_name,
                   birth_time, birth_place, methods
            FROM profiles
            WHERE identity <> $1
            ORDER BY identity
            "#,
        )
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in &rows {
            let identity: String = row.get("identity");
            match attributes_from_row(row) {
                Ok(attrs) => candidates.push((identity, attrs)),
                Err(e) => {
                    // Fail closed per candidate: a malformed profile scores
                    // with the fallback instead of aborting the feed
                    tracing::warn!("Malformed profile for {}, using fallback: {}", identity, e);
                    candidates.push((identity, UserAttributes::fallback()));
                }
            }
        }

        Ok(candidates)
    }
}
