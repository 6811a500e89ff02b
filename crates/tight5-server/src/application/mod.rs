//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod assistant_service;
mod joke_service;
mod migration_service;
mod routine_service;

pub use assistant_service::{AssistantService, SuggestionList};
pub use joke_service::JokeService;
pub use migration_service::MigrationService;
pub use routine_service::RoutineService;
