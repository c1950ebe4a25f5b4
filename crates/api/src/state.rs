use std::sync::Arc;

use crate::{
    config::Config,
    stores::{LeadStore, RateLimiter},
};

#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Lead persistence backend (redis or file).
    pub store: Arc<dyn LeadStore>,
    /// Per-IP fixed-window rate limiter.
    pub rate_limiter: Arc<dyn RateLimiter>,
}
