//! PostgreSQL implementation of JokeRepository

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use tight5::domain::entities::JokeStructureSelection;
use tight5::{DomainError, Joke, JokeRepository, JokeVersion, Performance};

/// PostgreSQL implementation of JokeRepository
pub struct PgJokeRepository {
    pool: PgPool,
}

impl PgJokeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::Repository(e.to_string())
}

/// Parse a stored enum value
fn parse<T: FromStr<Err = String>>(value: &str) -> Result<T, DomainError> {
    value.parse().map_err(DomainError::Repository)
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct JokeRow {
    id: Uuid,
    owner_id: String,
    title: String,
    setup: String,
    punchline: String,
    tags: Vec<String>,
    estimated_time: i32,
    energy: String,
    joke_type: String,
    status: String,
    notes: String,
    structure: Option<serde_json::Value>,
    techniques: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JokeRow {
    fn into_joke(
        self,
        versions: Vec<JokeVersion>,
        performances: Vec<Performance>,
    ) -> Result<Joke, DomainError> {
        let structure = match self.structure {
            Some(value) => Some(
                serde_json::from_value::<JokeStructureSelection>(value)
                    .map_err(|e| DomainError::Repository(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Joke {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            setup: self.setup,
            punchline: self.punchline,
            tags: self.tags,
            estimated_time: self.estimated_time.max(0) as u32,
            energy: parse(&self.energy)?,
            joke_type: parse(&self.joke_type)?,
            status: parse(&self.status)?,
            notes: self.notes,
            versions,
            performances,
            structure,
            techniques: self
                .techniques
                .iter()
                .map(|t| parse(t))
                .collect::<Result<_, _>>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VersionRow {
    id: Uuid,
    joke_id: Uuid,
    setup: String,
    punchline: String,
    tags: Vec<String>,
    notes: String,
    created_at: DateTime<Utc>,
}

impl From<VersionRow> for JokeVersion {
    fn from(row: VersionRow) -> Self {
        Self {
            id: row.id,
            setup: row.setup,
            punchline: row.punchline,
            tags: row.tags,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PerformanceRow {
    id: Uuid,
    joke_id: Uuid,
    routine_id: Option<Uuid>,
    date: DateTime<Utc>,
    actual_time: i32,
    outcome: String,
    notes: String,
    venue: Option<String>,
}

impl TryFrom<PerformanceRow> for Performance {
    type Error = DomainError;

    fn try_from(row: PerformanceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            joke_id: row.joke_id,
            routine_id: row.routine_id,
            date: row.date,
            actual_time: row.actual_time.max(0) as u32,
            outcome: parse(&row.outcome)?,
            notes: row.notes,
            venue: row.venue,
        })
    }
}

async fn upsert_joke(conn: &mut PgConnection, joke: &Joke) -> Result<JokeRow, DomainError> {
    let structure = joke.structure.as_ref().map(Json);
    let techniques: Vec<&str> = joke.techniques.iter().map(|t| t.as_str()).collect();

    sqlx::query_as::<_, JokeRow>(
        r#"
        INSERT INTO jokes (id, owner_id, title, setup, punchline, tags, estimated_time,
                           energy, joke_type, status, notes, structure, techniques,
                           created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        ON CONFLICT (id) DO UPDATE
        SET title = EXCLUDED.title, setup = EXCLUDED.setup, punchline = EXCLUDED.punchline,
            tags = EXCLUDED.tags, estimated_time = EXCLUDED.estimated_time,
            energy = EXCLUDED.energy, joke_type = EXCLUDED.joke_type, status = EXCLUDED.status,
            notes = EXCLUDED.notes, structure = EXCLUDED.structure,
            techniques = EXCLUDED.techniques, updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(joke.id)
    .bind(&joke.owner_id)
    .bind(&joke.title)
    .bind(&joke.setup)
    .bind(&joke.punchline)
    .bind(&joke.tags)
    .bind(joke.estimated_time as i32)
    .bind(joke.energy.as_str())
    .bind(joke.joke_type.as_str())
    .bind(joke.status.as_str())
    .bind(&joke.notes)
    .bind(structure)
    .bind(&techniques)
    .bind(joke.created_at)
    .bind(joke.updated_at)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_err)
}

async fn insert_version(
    conn: &mut PgConnection,
    joke_id: Uuid,
    version: &JokeVersion,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO joke_versions (id, joke_id, setup, punchline, tags, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(version.id)
    .bind(joke_id)
    .bind(&version.setup)
    .bind(&version.punchline)
    .bind(&version.tags)
    .bind(&version.notes)
    .bind(version.created_at)
    .execute(&mut *conn)
    .await
    .map_err(db_err)?;

    Ok(())
}

impl PgJokeRepository {
    async fn versions_of_owner(
        &self,
        owner_id: &str,
    ) -> Result<HashMap<Uuid, Vec<JokeVersion>>, DomainError> {
        let rows = sqlx::query_as::<_, VersionRow>(
            r#"
            SELECT v.* FROM joke_versions v
            JOIN jokes j ON j.id = v.joke_id
            WHERE j.owner_id = $1
            ORDER BY v.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut grouped: HashMap<Uuid, Vec<JokeVersion>> = HashMap::new();
        for row in rows {
            grouped.entry(row.joke_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn performances_of_owner(
        &self,
        owner_id: &str,
    ) -> Result<HashMap<Uuid, Vec<Performance>>, DomainError> {
        let rows = sqlx::query_as::<_, PerformanceRow>(
            r#"
            SELECT p.* FROM performances p
            JOIN jokes j ON j.id = p.joke_id
            WHERE j.owner_id = $1
            ORDER BY p.date DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut grouped: HashMap<Uuid, Vec<Performance>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.joke_id)
                .or_default()
                .push(Performance::try_from(row)?);
        }
        Ok(grouped)
    }
}

#[async_trait]
impl JokeRepository for PgJokeRepository {
    async fn find_all(&self, owner_id: &str) -> Result<Vec<Joke>, DomainError> {
        let rows = sqlx::query_as::<_, JokeRow>(
            "SELECT * FROM jokes WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut versions = self.versions_of_owner(owner_id).await?;
        let mut performances = self.performances_of_owner(owner_id).await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_joke(
                    versions.remove(&id).unwrap_or_default(),
                    performances.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Joke>, DomainError> {
        let row = sqlx::query_as::<_, JokeRow>("SELECT * FROM jokes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let versions = sqlx::query_as::<_, VersionRow>(
            "SELECT * FROM joke_versions WHERE joke_id = $1 ORDER BY created_at DESC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let performances = sqlx::query_as::<_, PerformanceRow>(
            "SELECT * FROM performances WHERE joke_id = $1 ORDER BY date DESC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(Performance::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        row.into_joke(versions.into_iter().map(Into::into).collect(), performances)
            .map(Some)
    }

    async fn save(&self, joke: &Joke) -> Result<Joke, DomainError> {
        self.save_with_versions(joke, &[]).await
    }

    async fn save_with_versions(
        &self,
        joke: &Joke,
        versions: &[JokeVersion],
    ) -> Result<Joke, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let row = upsert_joke(&mut *tx, joke).await?;
        for version in versions {
            insert_version(&mut *tx, joke.id, version).await?;
        }

        tx.commit().await.map_err(db_err)?;

        row.into_joke(Vec::new(), Vec::new())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r#"
            UPDATE routines SET updated_at = NOW()
            WHERE id IN (SELECT routine_id FROM routine_jokes WHERE joke_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        // Versions, performances and routine entries cascade
        let result = sqlx::query("DELETE FROM jokes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_performance(&self, performance: &Performance) -> Result<Performance, DomainError> {
        let row = sqlx::query_as::<_, PerformanceRow>(
            r#"
            INSERT INTO performances (id, joke_id, routine_id, date, actual_time, outcome, notes, venue)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(performance.id)
        .bind(performance.joke_id)
        .bind(performance.routine_id)
        .bind(performance.date)
        .bind(performance.actual_time as i32)
        .bind(performance.outcome.as_str())
        .bind(&performance.notes)
        .bind(&performance.venue)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn find_performance(&self, id: Uuid) -> Result<Option<Performance>, DomainError> {
        let row = sqlx::query_as::<_, PerformanceRow>("SELECT * FROM performances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(Performance::try_from).transpose()
    }

    async fn delete_performance(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM performances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_routine_performances(&self, routine_id: Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM performances WHERE routine_id = $1")
            .bind(routine_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected())
    }
}
