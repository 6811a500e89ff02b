//! In-memory test doubles
//!
//! One store backs both repository ports so deletes cascade the way the database does.
//! `ScriptedProvider` replays canned model replies in order.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use tight5::{
    ChatMessage, CompletionOptions, CompletionResponse, DomainError, Joke, JokeRepository,
    JokeVersion, LlmProvider, Performance, Routine, RoutineRepository, TokenUsage,
};

#[derive(Default)]
pub struct InMemoryStore {
    jokes: Mutex<HashMap<Uuid, Joke>>,
    routines: Mutex<HashMap<Uuid, Routine>>,
    fail_history: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later write that carries versions fail, the way a broken
    /// `joke_versions` insert aborts its transaction
    pub fn fail_history_writes(&self) {
        self.fail_history.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl JokeRepository for InMemoryStore {
    async fn find_all(&self, owner_id: &str) -> Result<Vec<Joke>, DomainError> {
        let jokes = self.jokes.lock().unwrap();
        let mut found: Vec<Joke> = jokes
            .values()
            .filter(|j| j.owner_id == owner_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Joke>, DomainError> {
        Ok(self.jokes.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, joke: &Joke) -> Result<Joke, DomainError> {
        self.save_with_versions(joke, &[]).await
    }

    async fn save_with_versions(
        &self,
        joke: &Joke,
        versions: &[JokeVersion],
    ) -> Result<Joke, DomainError> {
        if !versions.is_empty() && self.fail_history.load(Ordering::SeqCst) {
            return Err(DomainError::Repository("joke_versions insert failed".to_string()));
        }

        let mut jokes = self.jokes.lock().unwrap();
        let mut stored = joke.clone();
        match jokes.get(&joke.id) {
            Some(existing) => {
                stored.versions = existing.versions.clone();
                stored.performances = existing.performances.clone();
            }
            None => {
                stored.versions.clear();
                stored.performances.clear();
            }
        }
        for version in versions {
            stored.versions.insert(0, version.clone());
        }
        jokes.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let removed = self.jokes.lock().unwrap().remove(&id).is_some();
        if removed {
            for routine in self.routines.lock().unwrap().values_mut() {
                let before = routine.joke_ids.len();
                routine.joke_ids.retain(|j| *j != id);
                if routine.joke_ids.len() != before {
                    routine.touch();
                }
            }
        }
        Ok(removed)
    }

    async fn add_performance(&self, performance: &Performance) -> Result<Performance, DomainError> {
        let mut jokes = self.jokes.lock().unwrap();
        let joke = jokes
            .get_mut(&performance.joke_id)
            .ok_or_else(|| DomainError::not_found("Joke", performance.joke_id))?;
        joke.performances.push(performance.clone());
        joke.performances.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(performance.clone())
    }

    async fn find_performance(&self, id: Uuid) -> Result<Option<Performance>, DomainError> {
        let jokes = self.jokes.lock().unwrap();
        Ok(jokes
            .values()
            .flat_map(|j| j.performances.iter())
            .find(|p| p.id == id)
            .cloned())
    }

    async fn delete_performance(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut jokes = self.jokes.lock().unwrap();
        let mut removed = false;
        for joke in jokes.values_mut() {
            let before = joke.performances.len();
            joke.performances.retain(|p| p.id != id);
            removed |= joke.performances.len() != before;
        }
        Ok(removed)
    }

    async fn delete_routine_performances(&self, routine_id: Uuid) -> Result<u64, DomainError> {
        let mut jokes = self.jokes.lock().unwrap();
        let mut removed = 0u64;
        for joke in jokes.values_mut() {
            let before = joke.performances.len();
            joke.performances.retain(|p| p.routine_id != Some(routine_id));
            removed += (before - joke.performances.len()) as u64;
        }
        Ok(removed)
    }
}

#[async_trait]
impl RoutineRepository for InMemoryStore {
    async fn find_all(&self, owner_id: &str) -> Result<Vec<Routine>, DomainError> {
        let routines = self.routines.lock().unwrap();
        let mut found: Vec<Routine> = routines
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Routine>, DomainError> {
        Ok(self.routines.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, routine: &Routine) -> Result<Routine, DomainError> {
        self.routines
            .lock()
            .unwrap()
            .insert(routine.id, routine.clone());
        Ok(routine.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.routines.lock().unwrap().remove(&id).is_some())
    }
}

/// One canned model reply
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail,
    /// Never answers within any sane timeout
    Hang,
}

#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(Vec<ChatMessage>, CompletionOptions)>>,
}

impl ScriptedProvider {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn text(reply: &str) -> Self {
        Self::new([Reply::Text(reply.to_string())])
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, CompletionOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), options.clone()));
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Fail);

        match reply {
            Reply::Text(content) => Ok(CompletionResponse {
                content,
                model: "scripted-model".to_string(),
                usage: TokenUsage::default(),
                finish_reason: Some("stop".to_string()),
            }),
            Reply::Fail => Err(DomainError::ExternalService(
                "scripted failure".to_string(),
            )),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(DomainError::ExternalService("scripted hang".to_string()))
            }
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }
}
