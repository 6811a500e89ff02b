//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Joke: setup, punchline, versions and performances
//! - Performance: one delivery of a joke
//! - Routine: ordered, timed set of joke ids
//! - Structure: static joke-construction templates
//! - Analysis: typed results decoded from the external model
//! - Assistant: the closed set of model tasks

mod analysis;
mod assistant;
mod joke;
mod performance;
mod routine;
mod structure;

pub use analysis::*;
pub use assistant::*;
pub use joke::*;
pub use performance::*;
pub use routine::*;
pub use structure::*;
