//! Joke Application Service (Use Case)
//!
//! Orchestrates domain operations for jokes, their versions and performances.
//! Every operation is scoped to an owner.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use tight5::domain::services::validation::{
    sanitize_input, validate_joke_changes, validate_new_joke,
};
use tight5::domain::services::{filter_jokes, sort_jokes};
use tight5::{
    DomainError, Joke, JokeChanges, JokeFilters, JokeRepository, JokeSortOption, NewJoke,
    NewPerformance, Performance, RoutineRepository,
};

/// Application service for Joke operations
pub struct JokeService {
    jokes: Arc<dyn JokeRepository>,
    routines: Arc<dyn RoutineRepository>,
}

impl JokeService {
    pub fn new(jokes: Arc<dyn JokeRepository>, routines: Arc<dyn RoutineRepository>) -> Self {
        Self { jokes, routines }
    }

    /// Owner's jokes, filtered then sorted
    pub async fn list(
        &self,
        owner_id: &str,
        filters: &JokeFilters,
        sort: JokeSortOption,
    ) -> Result<Vec<Joke>, DomainError> {
        let mut jokes = filter_jokes(self.jokes.find_all(owner_id).await?, filters);
        sort_jokes(&mut jokes, sort);
        Ok(jokes)
    }

    /// Owner's jokes keyed by id
    pub async fn lookup(&self, owner_id: &str) -> Result<HashMap<Uuid, Joke>, DomainError> {
        let jokes = self.jokes.find_all(owner_id).await?;
        Ok(jokes.into_iter().map(|j| (j.id, j)).collect())
    }

    pub async fn get(&self, owner_id: &str, id: Uuid) -> Result<Joke, DomainError> {
        let joke = self
            .jokes
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Joke", id))?;

        if joke.owner_id != owner_id {
            return Err(DomainError::forbidden("Joke", id));
        }
        Ok(joke)
    }

    pub async fn create(&self, owner_id: &str, new: NewJoke) -> Result<Joke, DomainError> {
        let new = sanitize_new_joke(new);
        validate_new_joke(&new)?;

        let joke = Joke::new(owner_id, new);
        self.jokes.save(&joke).await?;

        tracing::info!("Created Joke: {} ({})", joke.title, joke.id);

        Ok(joke)
    }

    /// Partial update. A setup or punchline change records the previous text as a version.
    pub async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        changes: JokeChanges,
    ) -> Result<Joke, DomainError> {
        let changes = sanitize_changes(changes);
        validate_joke_changes(&changes)?;

        let joke = self.get(owner_id, id).await?;
        self.apply(joke, changes).await
    }

    /// Bring back the text of a stored version
    pub async fn restore_version(
        &self,
        owner_id: &str,
        id: Uuid,
        version_id: Uuid,
    ) -> Result<Joke, DomainError> {
        let joke = self.get(owner_id, id).await?;
        let changes = joke
            .restore_changes(version_id)
            .ok_or_else(|| DomainError::not_found("JokeVersion", version_id))?;

        tracing::info!("Restoring Joke {} to version {}", id, version_id);

        self.apply(joke, changes).await
    }

    async fn apply(&self, mut joke: Joke, changes: JokeChanges) -> Result<Joke, DomainError> {
        let version = joke.apply(changes);
        self.jokes.save_with_versions(&joke, version.as_slice()).await?;
        Ok(joke)
    }

    /// Delete a joke, its history and every reference to it in the owner's routines
    pub async fn delete(&self, owner_id: &str, id: Uuid) -> Result<(), DomainError> {
        self.get(owner_id, id).await?;

        if !self.jokes.delete(id).await? {
            return Err(DomainError::not_found("Joke", id));
        }

        tracing::info!("Deleted Joke: {}", id);
        Ok(())
    }

    pub async fn performances(
        &self,
        owner_id: &str,
        joke_id: Uuid,
    ) -> Result<Vec<Performance>, DomainError> {
        Ok(self.get(owner_id, joke_id).await?.performances)
    }

    pub async fn record_performance(
        &self,
        owner_id: &str,
        joke_id: Uuid,
        new: NewPerformance,
    ) -> Result<Performance, DomainError> {
        self.get(owner_id, joke_id).await?;

        if let Some(routine_id) = new.routine_id {
            let routine = self
                .routines
                .find_by_id(routine_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Routine", routine_id))?;
            if routine.owner_id != owner_id {
                return Err(DomainError::forbidden("Routine", routine_id));
            }
        }

        let new = NewPerformance {
            notes: sanitize_input(&new.notes),
            venue: new.venue.map(|v| sanitize_input(&v)).filter(|v| !v.is_empty()),
            ..new
        };
        let performance = self
            .jokes
            .add_performance(&Performance::new(joke_id, new))
            .await?;

        tracing::info!(
            "Recorded performance of Joke {}: {}",
            joke_id,
            performance.outcome
        );

        Ok(performance)
    }

    pub async fn delete_performance(&self, owner_id: &str, id: Uuid) -> Result<(), DomainError> {
        let performance = self
            .jokes
            .find_performance(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Performance", id))?;
        self.get(owner_id, performance.joke_id).await?;

        self.jokes.delete_performance(id).await?;
        Ok(())
    }
}

fn sanitize_tags(tags: Vec<String>) -> Vec<String> {
    tags.iter()
        .map(|t| sanitize_input(t))
        .filter(|t| !t.is_empty())
        .collect()
}

fn sanitize_new_joke(new: NewJoke) -> NewJoke {
    NewJoke {
        title: sanitize_input(&new.title),
        setup: sanitize_input(&new.setup),
        punchline: sanitize_input(&new.punchline),
        tags: sanitize_tags(new.tags),
        notes: new.notes.map(|n| sanitize_input(&n)),
        ..new
    }
}

fn sanitize_changes(changes: JokeChanges) -> JokeChanges {
    JokeChanges {
        title: changes.title.map(|t| sanitize_input(&t)),
        setup: changes.setup.map(|s| sanitize_input(&s)),
        punchline: changes.punchline.map(|p| sanitize_input(&p)),
        tags: changes.tags.map(sanitize_tags),
        notes: changes.notes.map(|n| sanitize_input(&n)),
        ..changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use tight5::domain::value_objects::{JokeSortField, SortDirection};
    use tight5::{JokeStatus, Outcome, Routine};

    fn service() -> (JokeService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (JokeService::new(store.clone(), store.clone()), store)
    }

    fn new_joke(title: &str) -> NewJoke {
        NewJoke {
            title: title.to_string(),
            setup: format!("{} setup", title),
            punchline: format!("{} punchline", title),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_validates_and_sanitizes() {
        let (service, _) = service();

        let err = service.create("alice", NewJoke::default()).await.unwrap_err();
        match err {
            DomainError::Validation(msg) => {
                assert!(msg.contains("Title is required"));
                assert!(msg.contains("Setup is required"));
                assert!(msg.contains("Punchline is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let joke = service
            .create(
                "alice",
                NewJoke {
                    title: " <b>Airports</b> ".to_string(),
                    ..new_joke("Airports")
                },
            )
            .await
            .unwrap();
        assert_eq!(joke.title, "bAirports/b");
        assert_eq!(joke.status, JokeStatus::Draft);
    }

    #[tokio::test]
    async fn test_other_owner_is_forbidden() {
        let (service, _) = service();
        let joke = service.create("alice", new_joke("Airports")).await.unwrap();

        assert!(matches!(
            service.get("bob", joke.id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.get("alice", Uuid::new_v4()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_records_version_and_restore_brings_text_back() {
        let (service, _) = service();
        let joke = service.create("alice", new_joke("Airports")).await.unwrap();

        let updated = service
            .update(
                "alice",
                joke.id,
                JokeChanges {
                    punchline: Some("Sharper punchline".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.versions.len(), 1);

        let stored = service.get("alice", joke.id).await.unwrap();
        assert_eq!(stored.versions.len(), 1);
        assert_eq!(stored.versions[0].punchline, "Airports punchline");

        let restored = service
            .restore_version("alice", joke.id, stored.versions[0].id)
            .await
            .unwrap();
        assert_eq!(restored.punchline, "Airports punchline");
        assert_eq!(restored.versions.len(), 2);
        assert_eq!(restored.versions[0].punchline, "Sharper punchline");
    }

    #[tokio::test]
    async fn test_failed_history_write_keeps_old_text() {
        let (service, store) = service();
        let joke = service.create("alice", new_joke("Airports")).await.unwrap();
        store.fail_history_writes();

        let err = service
            .update(
                "alice",
                joke.id,
                JokeChanges {
                    setup: Some("A new setup".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Repository(_)));

        let stored = service.get("alice", joke.id).await.unwrap();
        assert_eq!(stored.setup, "Airports setup");
        assert!(stored.versions.is_empty());

        // Changes that leave the text alone write no history and still go through
        let retitled = service
            .update(
                "alice",
                joke.id,
                JokeChanges {
                    title: Some("Airports, again".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(retitled.title, "Airports, again");
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let (service, _) = service();
        service.create("alice", new_joke("Banana")).await.unwrap();
        service.create("alice", new_joke("apple")).await.unwrap();
        service.create("bob", new_joke("Cherry")).await.unwrap();

        let sort = JokeSortOption::new(JokeSortField::Title, SortDirection::Asc);
        let jokes = service
            .list("alice", &JokeFilters::default(), sort)
            .await
            .unwrap();
        let titles: Vec<&str> = jokes.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "Banana"]);

        let filters = JokeFilters {
            search: Some("BANANA".to_string()),
            ..Default::default()
        };
        let jokes = service.list("alice", &filters, sort).await.unwrap();
        assert_eq!(jokes.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_joke_from_routines() {
        let (service, store) = service();
        let keep = service.create("alice", new_joke("Keep")).await.unwrap();
        let gone = service.create("alice", new_joke("Gone")).await.unwrap();

        let mut routine = Routine::new("alice", "Set".to_string(), None);
        routine.joke_ids = vec![gone.id, keep.id, gone.id];
        RoutineRepository::save(store.as_ref(), &routine).await.unwrap();

        service.delete("alice", gone.id).await.unwrap();

        let routine = RoutineRepository::find_by_id(store.as_ref(), routine.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(routine.joke_ids, vec![keep.id]);
        assert!(matches!(
            service.get("alice", gone.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_performances_recorded_and_deleted() {
        let (service, _) = service();
        let joke = service.create("alice", new_joke("Airports")).await.unwrap();

        let performance = service
            .record_performance(
                "alice",
                joke.id,
                NewPerformance {
                    actual_time: 42,
                    outcome: Outcome::Killed,
                    venue: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(performance.venue.is_none());

        let err = service
            .record_performance(
                "alice",
                joke.id,
                NewPerformance {
                    routine_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        assert_eq!(service.performances("alice", joke.id).await.unwrap().len(), 1);
        assert!(matches!(
            service.delete_performance("bob", performance.id).await,
            Err(DomainError::Forbidden(_))
        ));
        service
            .delete_performance("alice", performance.id)
            .await
            .unwrap();
        assert!(service.performances("alice", joke.id).await.unwrap().is_empty());
    }
}
