//! Tight 5 API Data Models
//!
//! - Joke: CRUD, listing query, performances
//! - Routine: CRUD and running-order edits
//! - Structure: template catalog
//! - Assistant: model-assisted writing
//! - Migrate: legacy browser-storage import

mod assistant;
mod joke;
mod migrate;
mod routine;
mod structure;

pub use assistant::*;
pub use joke::*;
pub use migrate::*;
pub use routine::*;
pub use structure::*;
