// Usage tracking: every composed or copied message can be logged as an event.
// Analytics are computed in Rust from raw samples so they stay unit-testable.

pub mod analytics;
pub mod handlers;
pub mod store;
