//! Joke Repository Port
//!
//! Abstract interface for Joke persistence, including the versions and performances a joke owns.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Joke, JokeVersion, Performance};

/// Repository interface for Joke entities
#[async_trait]
pub trait JokeRepository: Send + Sync {
    /// All jokes of an owner, newest first, with versions and performances loaded
    async fn find_all(&self, owner_id: &str) -> Result<Vec<Joke>, DomainError>;

    /// Find a Joke by ID, with versions and performances loaded
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Joke>, DomainError>;

    /// Save a Joke (insert or update). Versions and performances are not touched.
    async fn save(&self, joke: &Joke) -> Result<Joke, DomainError>;

    /// Save a Joke and append `versions` to its history as one unit: either the joke and every
    /// version are stored, or nothing is.
    async fn save_with_versions(
        &self,
        joke: &Joke,
        versions: &[JokeVersion],
    ) -> Result<Joke, DomainError>;

    /// Delete a Joke with its versions and performances, and drop it from every routine's running
    /// order, as one unit
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Record a performance
    async fn add_performance(&self, performance: &Performance) -> Result<Performance, DomainError>;

    async fn find_performance(&self, id: Uuid) -> Result<Option<Performance>, DomainError>;

    async fn delete_performance(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete every performance recorded against a routine
    async fn delete_routine_performances(&self, routine_id: Uuid) -> Result<u64, DomainError>;
}
