//! Shared test utilities for API handler tests.
//!
//! Provides sample payload factories and a `TestStateBuilder` for
//! constructing `AppState` instances with only the mocks a test needs.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::test_utils::TestStateBuilder;
//!
//! let mut store = MockLeadStore::new();
//! store.expect_insert_if_absent().returning(|_| Ok(InsertOutcome::Inserted));
//!
//! let state = TestStateBuilder::new().with_store(store).build();
//! ```

use std::sync::Arc;

use chrono::Utc;
use http_body_util::BodyExt;

use crate::config::{Backend, Config};
use crate::models::LeadRecord;
use crate::state::AppState;
use crate::stores::{MockLeadStore, MockRateLimiter, RateLimitResult};
use shared::api::{LeadPayload, LeadType, PreferredContact};

/// Creates a test configuration with dummy values.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        backend: Backend::Redis,
        redis_url: Some("redis://test".to_string()),
        file_path: None,
        rate_limit: 8,
        rate_window_secs: 60,
        env: "test".to_string(),
        sentry_dsn: None,
    }
}

/// A validated payload for the given lead token.
pub fn sample_payload(lead_id: &str) -> LeadPayload {
    LeadPayload {
        lead_id: lead_id.to_string(),
        lead_type: LeadType::Marina,
        name: "Ana Souza".to_string(),
        company: "Marina Azul".to_string(),
        legal_name: None,
        cnpj: Some("11222333000181".to_string()),
        company_in_setup: false,
        email: "ana@marinaazul.com.br".to_string(),
        phone: Some("+55 11 99999-0000".to_string()),
        city: Some("Ilhabela".to_string()),
        state: Some("SP".to_string()),
        niche: None,
        monthly_revenue: None,
        operating_region: None,
        capacity: None,
        role: None,
        preferred_contact: PreferredContact::Whatsapp,
        message: None,
        website: None,
        honeypot: String::new(),
    }
}

/// A persistable record for the given lead token, id already digested.
pub fn sample_record(lead_id: &str) -> LeadRecord {
    use sha2::{Digest, Sha256};

    LeadRecord::new(
        hex::encode(Sha256::digest(lead_id.as_bytes())),
        Utc::now(),
        "203.0.113.9".to_string(),
        sample_payload(lead_id),
    )
}

/// A raw form body that passes validation.
pub fn sample_submission() -> serde_json::Value {
    serde_json::json!({
        "leadId": "lead-abc-123",
        "type": "marina",
        "name": "Ana Souza",
        "company": "Marina Azul",
        "cnpj": "11.222.333/0001-81",
        "email": "ana@marinaazul.com.br",
        "phone": "+55 11 99999-0000",
        "city": "Ilhabela",
        "state": "SP",
        "honeypot": ""
    })
}

/// Reads a response body to a string.
pub async fn response_body(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Mock limiter that admits everything; the default for tests that are not
/// about rate limiting.
fn permissive_rate_limiter() -> MockRateLimiter {
    let mut limiter = MockRateLimiter::new();
    limiter
        .expect_admit()
        .returning(|_, _| RateLimitResult::Allowed(1));
    limiter
}

/// Builder for constructing test `AppState` with custom mocks.
///
/// Uses a default (empty) store mock and an admit-everything limiter for
/// anything not explicitly set.
pub struct TestStateBuilder {
    store: Option<MockLeadStore>,
    rate_limiter: Option<MockRateLimiter>,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            rate_limiter: None,
        }
    }

    pub fn with_store(mut self, store: MockLeadStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_rate_limiter(mut self, limiter: MockRateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn build(self) -> AppState {
        AppState {
            config: test_config(),
            store: Arc::new(self.store.unwrap_or_else(MockLeadStore::new)),
            rate_limiter: Arc::new(self.rate_limiter.unwrap_or_else(permissive_rate_limiter)),
        }
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
