//! Routine Repository Port
//!
//! Abstract interface for Routine persistence. The running order is stored as given,
//! duplicates included.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Routine};

/// Repository interface for Routine entities
#[async_trait]
pub trait RoutineRepository: Send + Sync {
    /// All routines of an owner, newest first
    async fn find_all(&self, owner_id: &str) -> Result<Vec<Routine>, DomainError>;

    /// Find a Routine by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Routine>, DomainError>;

    /// Save a Routine (insert or update), replacing its running order
    async fn save(&self, routine: &Routine) -> Result<Routine, DomainError>;

    /// Delete a Routine by ID
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
