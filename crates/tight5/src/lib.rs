//! Tight 5 Domain Library
//!
//! Core domain types, pure services and interfaces for the Tight 5 comedy writing system.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Joke, Performance, Routine, StructureTemplate)
//!   - `value_objects/`: Immutable value types (Energy, JokeType, Outcome, sort/filter options)
//!   - `services/`: Metrics, prompt pipeline, decoder, guardrail, structure catalog
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External model interface
//!
//! # Usage
//!
//! ```rust,ignore
//! use tight5::domain::{Joke, Routine};
//! use tight5::domain::services::{decode_suggestions, total_duration};
//! use tight5::ports::{JokeRepository, LlmProvider};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AssistantTask, DomainError, Energy, Joke, JokeChanges, JokeFilters, JokeSortOption,
    JokeStatus, JokeType, JokeVersion, NewJoke, NewPerformance, NewRoutine, Outcome, Performance,
    Routine, RoutineChanges, StructureTemplate, SuggestionSource,
};
pub use ports::{
    ChatMessage, CompletionOptions, CompletionResponse, JokeRepository, LlmProvider, MessageRole,
    RoutineRepository, TokenUsage,
};
