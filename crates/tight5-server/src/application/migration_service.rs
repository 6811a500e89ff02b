//! Migration Application Service
//!
//! Imports jokes and routines kept in browser storage by older clients. Old joke ids are mapped
//! to new ones; routine references to jokes that did not make it are dropped. A failing item is
//! logged and skipped.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use tight5::domain::entities::DEFAULT_ESTIMATED_TIME;
use tight5::domain::services::score::clamp_score;
use tight5::domain::services::validation::{validate_new_joke, validate_routine};
use tight5::{
    DomainError, Joke, JokeRepository, JokeVersion, NewJoke, NewPerformance, Performance,
    Routine, RoutineRepository,
};

use crate::models::{LegacyJoke, LegacyRoutine};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub jokes_created: usize,
    pub routines_created: usize,
}

impl MigrationReport {
    pub fn message(&self) -> String {
        format!(
            "Successfully migrated {} jokes and {} routines",
            self.jokes_created, self.routines_created
        )
    }
}

/// Application service for legacy imports
pub struct MigrationService {
    jokes: Arc<dyn JokeRepository>,
    routines: Arc<dyn RoutineRepository>,
}

impl MigrationService {
    pub fn new(jokes: Arc<dyn JokeRepository>, routines: Arc<dyn RoutineRepository>) -> Self {
        Self { jokes, routines }
    }

    pub async fn migrate(
        &self,
        owner_id: &str,
        jokes: Vec<serde_json::Value>,
        routines: Vec<serde_json::Value>,
    ) -> Result<MigrationReport, DomainError> {
        let mut report = MigrationReport::default();
        let mut id_map: HashMap<String, Uuid> = HashMap::new();

        for value in jokes {
            let result = match serde_json::from_value::<LegacyJoke>(value) {
                Ok(legacy) => self.import_joke(owner_id, legacy).await,
                Err(e) => Err(DomainError::Validation(e.to_string())),
            };
            match result {
                Ok((old_id, new_id)) => {
                    id_map.insert(old_id, new_id);
                    report.jokes_created += 1;
                }
                Err(e) => tracing::warn!("Skipping joke during migration: {}", e),
            }
        }

        for value in routines {
            let result = match serde_json::from_value::<LegacyRoutine>(value) {
                Ok(legacy) => self.import_routine(owner_id, legacy, &id_map).await,
                Err(e) => Err(DomainError::Validation(e.to_string())),
            };
            match result {
                Ok(()) => report.routines_created += 1,
                Err(e) => tracing::warn!("Skipping routine during migration: {}", e),
            }
        }

        tracing::info!(
            "Migrated {} jokes and {} routines for {}",
            report.jokes_created,
            report.routines_created,
            owner_id
        );

        Ok(report)
    }

    async fn import_joke(
        &self,
        owner_id: &str,
        legacy: LegacyJoke,
    ) -> Result<(String, Uuid), DomainError> {
        let new = NewJoke {
            title: legacy.title,
            setup: legacy.setup,
            punchline: legacy.punchline,
            tags: legacy.tags,
            estimated_time: Some(
                legacy
                    .estimated_time
                    .filter(|t| *t > 0)
                    .unwrap_or(DEFAULT_ESTIMATED_TIME),
            ),
            energy: legacy.energy,
            joke_type: legacy.joke_type,
            status: legacy.status,
            notes: legacy.notes,
            ..Default::default()
        };
        validate_new_joke(&new)?;

        let now = Utc::now();
        let mut joke = Joke::new(owner_id, new);
        joke.created_at = legacy.created_at.unwrap_or(now);
        joke.updated_at = legacy.updated_at.unwrap_or(now);

        let mut versions: Vec<JokeVersion> = legacy
            .versions
            .into_iter()
            .map(|v| JokeVersion {
                id: Uuid::new_v4(),
                setup: v.setup,
                punchline: v.punchline,
                tags: v.tags,
                notes: v.notes,
                created_at: v.created_at.unwrap_or(now),
            })
            .collect();
        versions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        self.jokes.save_with_versions(&joke, &versions).await?;

        // Routine ids from browser storage mean nothing here; performances come in unattached
        for p in legacy.performances {
            let performance = Performance::new(
                joke.id,
                NewPerformance {
                    routine_id: None,
                    date: p.date,
                    actual_time: p.actual_time.unwrap_or(0),
                    outcome: p.outcome.unwrap_or_default(),
                    notes: p.notes,
                    venue: p.venue,
                },
            );
            self.jokes.add_performance(&performance).await?;
        }

        Ok((legacy.id, joke.id))
    }

    async fn import_routine(
        &self,
        owner_id: &str,
        legacy: LegacyRoutine,
        id_map: &HashMap<String, Uuid>,
    ) -> Result<(), DomainError> {
        let target_time = legacy.target_time.filter(|t| *t > 0);
        validate_routine(Some(&legacy.name), target_time)?;

        let now = Utc::now();
        let mut routine = Routine::new(owner_id, legacy.name, target_time);
        routine.joke_ids = legacy
            .joke_ids
            .iter()
            .filter_map(|old| id_map.get(old).copied())
            .collect();
        routine.flow_score = legacy.flow_score.map(clamp_score);
        routine.created_at = legacy.created_at.unwrap_or(now);
        routine.updated_at = legacy.updated_at.unwrap_or(now);

        self.routines.save(&routine).await?;
        Ok(())
    }
}
