//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod energy;
mod joke_status;
mod joke_type;
mod outcome;
mod sort_option;
mod suggestion_source;
mod technique;

pub use energy::*;
pub use joke_status::*;
pub use joke_type::*;
pub use outcome::*;
pub use sort_option::*;
pub use suggestion_source::*;
pub use technique::*;
