//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod joke_repository;
mod routine_repository;

pub use joke_repository::*;
pub use routine_repository::*;
