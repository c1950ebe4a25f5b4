//! Lead persistence and rate limiting.
//!
//! Both concerns sit behind traits so handlers can be tested with mocks and
//! so the two persistence backends stay interchangeable behind one contract.
//!
//! ## Redis Key Patterns
//!
//! ```text
//! lead:{id}            → LeadRecord JSON (SET NX, the conditional insert)
//! leads:type:{type}    → Sorted set of "{receivedAt}#{id}", score = timestamp
//! ```
//!
//! ## Usage in Handlers
//!
//! ```ignore
//! async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
//!     if !state.rate_limiter.admit(&ip, Utc::now()).is_allowed() { /* 429 */ }
//!     match state.store.insert_if_absent(&record).await? { /* ... */ }
//! }
//! ```

mod leads;
mod rate_limit;

pub use leads::{FileLeadStore, InsertOutcome, LeadStore, RedisLeadStore};
pub use rate_limit::{FixedWindowLimiter, RateLimitResult, RateLimiter};

#[cfg(test)]
pub use leads::MockLeadStore;
#[cfg(test)]
pub use rate_limit::MockRateLimiter;
