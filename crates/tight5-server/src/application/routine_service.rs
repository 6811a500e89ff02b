//! Routine Application Service (Use Case)
//!
//! Orchestrates routine editing. The running order lives on the routine; the current time is
//! derived from the owner's jokes on every read.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use tight5::domain::entities::{FlowAnalysis, RoutineJokeSummary};
use tight5::domain::services::{routine_ops, total_duration};
use tight5::domain::services::validation::{sanitize_input, validate_routine};
use tight5::{
    DomainError, Joke, JokeRepository, NewRoutine, Routine, RoutineChanges, RoutineRepository,
};

/// Application service for Routine operations
pub struct RoutineService {
    routines: Arc<dyn RoutineRepository>,
    jokes: Arc<dyn JokeRepository>,
}

impl RoutineService {
    pub fn new(routines: Arc<dyn RoutineRepository>, jokes: Arc<dyn JokeRepository>) -> Self {
        Self { routines, jokes }
    }

    async fn lookup(&self, owner_id: &str) -> Result<HashMap<Uuid, Joke>, DomainError> {
        let jokes = self.jokes.find_all(owner_id).await?;
        Ok(jokes.into_iter().map(|j| (j.id, j)).collect())
    }

    fn with_current_time(mut routine: Routine, jokes: &HashMap<Uuid, Joke>) -> Routine {
        routine.current_time = total_duration(&routine.joke_ids, jokes);
        routine
    }

    /// Every id must name one of the owner's jokes
    fn check_joke_ids(ids: &[Uuid], jokes: &HashMap<Uuid, Joke>) -> Result<(), DomainError> {
        match ids.iter().find(|id| !jokes.contains_key(*id)) {
            Some(id) => Err(DomainError::Validation(format!("Unknown joke id: {}", id))),
            None => Ok(()),
        }
    }

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Routine, DomainError> {
        let routine = self
            .routines
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Routine", id))?;

        if routine.owner_id != owner_id {
            return Err(DomainError::forbidden("Routine", id));
        }
        Ok(routine)
    }

    async fn store(
        &self,
        mut routine: Routine,
        jokes: &HashMap<Uuid, Joke>,
    ) -> Result<Routine, DomainError> {
        routine.touch();
        self.routines.save(&routine).await?;
        Ok(Self::with_current_time(routine, jokes))
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<Routine>, DomainError> {
        let jokes = self.lookup(owner_id).await?;
        let routines = self.routines.find_all(owner_id).await?;
        Ok(routines
            .into_iter()
            .map(|r| Self::with_current_time(r, &jokes))
            .collect())
    }

    pub async fn get(&self, owner_id: &str, id: Uuid) -> Result<Routine, DomainError> {
        let routine = self.find_owned(owner_id, id).await?;
        let jokes = self.lookup(owner_id).await?;
        Ok(Self::with_current_time(routine, &jokes))
    }

    /// The routine with its jokes projected for assistant prompts
    pub async fn summaries(
        &self,
        owner_id: &str,
        id: Uuid,
    ) -> Result<(Routine, Vec<RoutineJokeSummary>), DomainError> {
        let routine = self.find_owned(owner_id, id).await?;
        let jokes = self.lookup(owner_id).await?;
        let summaries = routine_ops::joke_summaries(&routine.joke_ids, &jokes);
        Ok((Self::with_current_time(routine, &jokes), summaries))
    }

    pub async fn create(&self, owner_id: &str, new: NewRoutine) -> Result<Routine, DomainError> {
        let name = sanitize_input(&new.name);
        validate_routine(Some(&name), new.target_time)?;

        let jokes = self.lookup(owner_id).await?;
        Self::check_joke_ids(&new.joke_ids, &jokes)?;

        let mut routine = Routine::new(owner_id, name, new.target_time);
        routine.joke_ids = new.joke_ids;
        routine.flow_score = new.flow_score.map(|s| s.min(100));
        self.routines.save(&routine).await?;

        tracing::info!("Created Routine: {} ({})", routine.name, routine.id);

        Ok(Self::with_current_time(routine, &jokes))
    }

    pub async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        changes: RoutineChanges,
    ) -> Result<Routine, DomainError> {
        let name = changes.name.map(|n| sanitize_input(&n));
        validate_routine(name.as_deref(), changes.target_time)?;

        let mut routine = self.find_owned(owner_id, id).await?;
        let jokes = self.lookup(owner_id).await?;

        if let Some(name) = name {
            routine.name = name;
        }
        if let Some(target_time) = changes.target_time {
            routine.target_time = target_time;
        }
        if let Some(flow_score) = changes.flow_score {
            routine.flow_score = Some(flow_score.min(100));
        }
        if let Some(joke_ids) = changes.joke_ids {
            Self::check_joke_ids(&joke_ids, &jokes)?;
            routine.joke_ids = joke_ids;
        }

        self.store(routine, &jokes).await
    }

    /// Delete a routine and the performances recorded against it
    pub async fn delete(&self, owner_id: &str, id: Uuid) -> Result<(), DomainError> {
        self.find_owned(owner_id, id).await?;

        let removed = self.jokes.delete_routine_performances(id).await?;
        if !self.routines.delete(id).await? {
            return Err(DomainError::not_found("Routine", id));
        }

        tracing::info!("Deleted Routine: {} ({} performances)", id, removed);
        Ok(())
    }

    /// Insert a joke at `position` (clamped), or append it
    pub async fn insert_joke(
        &self,
        owner_id: &str,
        id: Uuid,
        joke_id: Uuid,
        position: Option<usize>,
    ) -> Result<Routine, DomainError> {
        let mut routine = self.find_owned(owner_id, id).await?;
        let jokes = self.lookup(owner_id).await?;
        Self::check_joke_ids(&[joke_id], &jokes)?;

        routine_ops::insert_joke(&mut routine.joke_ids, joke_id, position);
        self.store(routine, &jokes).await
    }

    /// Remove every occurrence of a joke from the running order
    pub async fn remove_joke(
        &self,
        owner_id: &str,
        id: Uuid,
        joke_id: Uuid,
    ) -> Result<Routine, DomainError> {
        let mut routine = self.find_owned(owner_id, id).await?;
        let jokes = self.lookup(owner_id).await?;

        if routine_ops::remove_joke(&mut routine.joke_ids, joke_id) == 0 {
            return Err(DomainError::not_found("Joke", joke_id));
        }
        self.store(routine, &jokes).await
    }

    pub async fn move_joke(
        &self,
        owner_id: &str,
        id: Uuid,
        from: usize,
        to: usize,
    ) -> Result<Routine, DomainError> {
        let mut routine = self.find_owned(owner_id, id).await?;
        let jokes = self.lookup(owner_id).await?;

        routine_ops::move_joke(&mut routine.joke_ids, from, to)?;
        self.store(routine, &jokes).await
    }

    /// Persist the flow score and suggestions of a model analysis
    pub async fn record_flow(
        &self,
        owner_id: &str,
        id: Uuid,
        analysis: &FlowAnalysis,
    ) -> Result<Routine, DomainError> {
        let mut routine = self.find_owned(owner_id, id).await?;
        let jokes = self.lookup(owner_id).await?;

        routine.flow_score = Some(analysis.flow_score);
        routine.ai_suggestions = analysis.suggestions.clone();

        tracing::info!(
            "Routine {} flow score: {} ({} suggestions)",
            id,
            analysis.flow_score,
            routine.ai_suggestions.len()
        );

        self.store(routine, &jokes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use tight5::{NewJoke, NewPerformance, Outcome, Performance};

    async fn setup() -> (RoutineService, Arc<InMemoryStore>, Vec<Joke>) {
        let store = Arc::new(InMemoryStore::new());
        let mut jokes = Vec::new();
        for (title, time) in [("Opener", 45), ("Middle", 60), ("Closer", 90)] {
            let joke = Joke::new(
                "alice",
                NewJoke {
                    title: title.to_string(),
                    setup: "setup".to_string(),
                    punchline: "punchline".to_string(),
                    estimated_time: Some(time),
                    ..Default::default()
                },
            );
            JokeRepository::save(store.as_ref(), &joke).await.unwrap();
            jokes.push(joke);
        }
        (
            RoutineService::new(store.clone(), store.clone()),
            store,
            jokes,
        )
    }

    #[tokio::test]
    async fn test_create_computes_current_time() {
        let (service, _, jokes) = setup().await;
        let routine = service
            .create(
                "alice",
                NewRoutine {
                    name: "Friday".to_string(),
                    joke_ids: vec![jokes[0].id, jokes[2].id, jokes[0].id],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(routine.target_time, 300);
        assert_eq!(routine.current_time, 45 + 90 + 45);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_jokes_and_bad_input() {
        let (service, _, _) = setup().await;

        let err = service
            .create(
                "alice",
                NewRoutine {
                    name: "Set".to_string(),
                    joke_ids: vec![Uuid::new_v4()],
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .create(
                "alice",
                NewRoutine {
                    name: " ".to_string(),
                    target_time: Some(4000),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_running_order_edits() {
        let (service, _, jokes) = setup().await;
        let routine = service
            .create(
                "alice",
                NewRoutine {
                    name: "Set".to_string(),
                    joke_ids: vec![jokes[0].id, jokes[1].id],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let routine = service
            .insert_joke("alice", routine.id, jokes[2].id, Some(0))
            .await
            .unwrap();
        assert_eq!(routine.joke_ids, vec![jokes[2].id, jokes[0].id, jokes[1].id]);

        let routine = service.move_joke("alice", routine.id, 0, 2).await.unwrap();
        assert_eq!(routine.joke_ids, vec![jokes[0].id, jokes[1].id, jokes[2].id]);

        let routine = service
            .remove_joke("alice", routine.id, jokes[1].id)
            .await
            .unwrap();
        assert_eq!(routine.joke_ids, vec![jokes[0].id, jokes[2].id]);
        assert_eq!(routine.current_time, 135);

        assert!(matches!(
            service.move_joke("alice", routine.id, 5, 0).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.remove_joke("alice", routine.id, jokes[1].id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.get("bob", routine.id).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_routine_performances() {
        let (service, store, jokes) = setup().await;
        let routine = service
            .create(
                "alice",
                NewRoutine {
                    name: "Set".to_string(),
                    joke_ids: vec![jokes[0].id],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let in_set = Performance::new(
            jokes[0].id,
            NewPerformance {
                routine_id: Some(routine.id),
                outcome: Outcome::Killed,
                ..Default::default()
            },
        );
        let solo = Performance::new(jokes[0].id, NewPerformance::default());
        store.add_performance(&in_set).await.unwrap();
        store.add_performance(&solo).await.unwrap();

        service.delete("alice", routine.id).await.unwrap();

        let joke = JokeRepository::find_by_id(store.as_ref(), jokes[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(joke.performances.len(), 1);
        assert_eq!(joke.performances[0].id, solo.id);
        assert!(matches!(
            service.get("alice", routine.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
