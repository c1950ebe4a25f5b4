//! Wire types for the lead submission endpoint.
//!
//! Field names match the marketing site's form payload (camelCase, pt-BR
//! enum values), so the site posts to the API without a translation layer.

use serde::{Deserialize, Serialize};

/// Lead category chosen on the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadType {
    #[default]
    Parceiro,
    Marina,
    Loja,
}

impl LeadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadType::Parceiro => "parceiro",
            LeadType::Marina => "marina",
            LeadType::Loja => "loja",
        }
    }
}

/// Business niche, optional on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Niche {
    Passeios,
    Aluguel,
    DayUse,
    Servicos,
    Marina,
    Loja,
    Outro,
}

/// Self-reported monthly revenue band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueBand {
    #[serde(rename = "prefiro_nao_informar")]
    PrefiroNaoInformar,
    #[serde(rename = "ate_50k_mes")]
    Ate50kMes,
    #[serde(rename = "50k_200k_mes")]
    De50kA200kMes,
    #[serde(rename = "200k_1m_mes")]
    De200kA1mMes,
    #[serde(rename = "acima_1m_mes")]
    Acima1mMes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredContact {
    #[default]
    Whatsapp,
    Email,
}

/// A lead submission after validation and normalization.
///
/// Produced by [`crate::validate::validate_lead`]; the raw form body never
/// reaches persistence directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    /// Client-generated token; the server derives the idempotency key from it.
    pub lead_id: String,
    #[serde(rename = "type")]
    pub lead_type: LeadType,
    pub name: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    /// Digits only after normalization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    /// Company not yet registered; waives the CNPJ requirement.
    pub company_in_setup: bool,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niche: Option<Niche>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<RevenueBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub preferred_contact: PreferredContact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Hidden form field; non-empty means a bot filled the form.
    pub honeypot: String,
}

/// Response body for `POST /api/leads`, every status code included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotent: Option<bool>,
}

impl LeadResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
            idempotent: None,
        }
    }

    /// Success for a lead that was already stored under the same token.
    pub fn idempotent() -> Self {
        Self {
            ok: true,
            error: None,
            idempotent: Some(true),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            idempotent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_type_uses_form_wire_values() {
        assert_eq!(serde_json::to_string(&LeadType::Parceiro).unwrap(), "\"parceiro\"");
        assert_eq!(serde_json::to_string(&LeadType::Loja).unwrap(), "\"loja\"");
    }

    #[test]
    fn revenue_band_uses_form_wire_values() {
        assert_eq!(
            serde_json::to_string(&RevenueBand::De50kA200kMes).unwrap(),
            "\"50k_200k_mes\""
        );
        assert_eq!(
            serde_json::to_string(&RevenueBand::Ate50kMes).unwrap(),
            "\"ate_50k_mes\""
        );
    }

    #[test]
    fn success_response_omits_optional_fields() {
        assert_eq!(serde_json::to_string(&LeadResponse::ok()).unwrap(), r#"{"ok":true}"#);
    }

    #[test]
    fn idempotent_response_carries_marker() {
        assert_eq!(
            serde_json::to_string(&LeadResponse::idempotent()).unwrap(),
            r#"{"ok":true,"idempotent":true}"#
        );
    }

    #[test]
    fn error_response_carries_reason() {
        assert_eq!(
            serde_json::to_string(&LeadResponse::error("email inválido")).unwrap(),
            r#"{"ok":false,"error":"email inválido"}"#
        );
    }
}
