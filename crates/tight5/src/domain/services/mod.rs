//! Domain Services
//!
//! Pure, synchronous logic shared by every caller:
//! - metrics: durations, ratings, sort and filter
//! - decoder: model output to typed results
//! - prompts: request builders per assistant task
//! - guardrail: topical input screen
//! - fallback: local suggestions when the model is unavailable
//! - structures: the template catalog
//! - routine_ops: running-order edits and time helpers
//! - validation: joke and routine input rules

pub mod decoder;
pub mod fallback;
pub mod guardrail;
pub mod metrics;
pub mod prompts;
pub mod routine_ops;
pub mod score;
pub mod structures;
pub mod validation;

pub use decoder::{decode_object, decode_suggestions, ensure_permutation, DecodeError};
pub use metrics::{filter_jokes, performance_rating, sort_jokes, total_duration};
pub use prompts::{build as build_prompt, PromptRequest, SystemPrompt};
pub use routine_ops::{format_time, time_status, TimeStatus};
