//! Server-side services that are not domain use cases

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, FixedWindowRateLimiter};
