//! PostgreSQL implementation of RoutineRepository
//!
//! The running order lives in `routine_jokes`, keyed by position.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use tight5::domain::entities::RoutineSuggestion;
use tight5::{DomainError, Routine, RoutineRepository};

/// PostgreSQL implementation of RoutineRepository
pub struct PgRoutineRepository {
    pool: PgPool,
}

impl PgRoutineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::Repository(e.to_string())
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct RoutineRow {
    id: Uuid,
    owner_id: String,
    name: String,
    target_time: i32,
    flow_score: Option<i16>,
    ai_suggestions: Json<Vec<RoutineSuggestion>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoutineRow {
    /// `current_time` is left at zero; it is derived from jokes by the caller
    fn into_routine(self, joke_ids: Vec<Uuid>) -> Routine {
        Routine {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            joke_ids,
            target_time: self.target_time.max(0) as u32,
            current_time: 0,
            flow_score: self.flow_score.map(|s| s.clamp(0, 100) as u8),
            ai_suggestions: self.ai_suggestions.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RoutineJokeRow {
    routine_id: Uuid,
    joke_id: Uuid,
}

impl PgRoutineRepository {
    async fn running_order(&self, routine_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT joke_id FROM routine_jokes WHERE routine_id = $1 ORDER BY position",
        )
        .bind(routine_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)
    }
}

#[async_trait]
impl RoutineRepository for PgRoutineRepository {
    async fn find_all(&self, owner_id: &str) -> Result<Vec<Routine>, DomainError> {
        let rows = sqlx::query_as::<_, RoutineRow>(
            "SELECT * FROM routines WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let entries = sqlx::query_as::<_, RoutineJokeRow>(
            r#"
            SELECT rj.routine_id, rj.joke_id FROM routine_jokes rj
            JOIN routines r ON r.id = rj.routine_id
            WHERE r.owner_id = $1
            ORDER BY rj.routine_id, rj.position
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut orders: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for entry in entries {
            orders.entry(entry.routine_id).or_default().push(entry.joke_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let joke_ids = orders.remove(&row.id).unwrap_or_default();
                row.into_routine(joke_ids)
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Routine>, DomainError> {
        let row = sqlx::query_as::<_, RoutineRow>("SELECT * FROM routines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => {
                let joke_ids = self.running_order(id).await?;
                Ok(Some(row.into_routine(joke_ids)))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, routine: &Routine) -> Result<Routine, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = sqlx::query_as::<_, RoutineRow>(
            r#"
            INSERT INTO routines (id, owner_id, name, target_time, flow_score, ai_suggestions,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name, target_time = EXCLUDED.target_time,
                flow_score = EXCLUDED.flow_score, ai_suggestions = EXCLUDED.ai_suggestions,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(routine.id)
        .bind(&routine.owner_id)
        .bind(&routine.name)
        .bind(routine.target_time as i32)
        .bind(routine.flow_score.map(i16::from))
        .bind(Json(&routine.ai_suggestions))
        .bind(routine.created_at)
        .bind(routine.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        // Replace the running order
        sqlx::query("DELETE FROM routine_jokes WHERE routine_id = $1")
            .bind(routine.id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for (position, joke_id) in routine.joke_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO routine_jokes (routine_id, position, joke_id) VALUES ($1, $2, $3)",
            )
            .bind(routine.id)
            .bind(position as i32)
            .bind(joke_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;

        Ok(row.into_routine(routine.joke_ids.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        // Running order and routine performances cascade
        let result = sqlx::query("DELETE FROM routines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
