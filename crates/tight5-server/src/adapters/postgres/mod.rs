//! PostgreSQL Repository Implementations

mod joke_repository;
mod routine_repository;

pub use joke_repository::PgJokeRepository;
pub use routine_repository::PgRoutineRepository;
