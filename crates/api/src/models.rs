use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::api::LeadPayload;

/// A lead as persisted. At most one record exists per `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Hex SHA-256 of the client-supplied lead token; the idempotency key.
    pub id: String,
    /// Server receipt time, assigned once and never mutated.
    #[serde(rename = "receivedAt")]
    pub received_at: DateTime<Utc>,
    /// Originating address, as derived for rate limiting.
    pub ip: String,
    #[serde(flatten)]
    pub lead: LeadPayload,
    /// Always "new"; downstream processing happens outside this service.
    pub status: String,
    pub source: String,
}

impl LeadRecord {
    pub fn new(id: String, received_at: DateTime<Utc>, ip: String, lead: LeadPayload) -> Self {
        Self {
            id,
            received_at,
            ip,
            lead,
            status: "new".to_string(),
            source: "site".to_string(),
        }
    }
}
