//! Lead validation and normalization.
//!
//! Takes the raw, untyped form body and produces a [`LeadPayload`] or a
//! user-facing rejection reason (pt-BR, shown directly on the form).
//! Normalization is lenient where the form is lenient: free-text fields are
//! trimmed and truncated, unknown enum values coerce to a default instead of
//! rejecting, and the CNPJ requirement is waived for companies still being
//! registered.

use serde_json::Value;

use crate::api::{LeadPayload, LeadType, Niche, PreferredContact, RevenueBand};

/// Default truncation length for free-text fields.
const MAX_TEXT: usize = 240;

/// Stringify, trim, and truncate a raw field to `max` characters.
pub fn sanitize(value: &Value, max: usize) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.chars().count() > max {
        trimmed.chars().take(max).collect()
    } else {
        trimmed.to_string()
    }
}

fn field<'a>(body: &'a Value, key: &str) -> &'a Value {
    body.get(key).unwrap_or(&Value::Null)
}

/// JavaScript-style truthiness, matching what the form actually sends for
/// checkbox fields (true, "on", 1, ...).
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn as_lead_type(value: &str) -> LeadType {
    match value {
        "marina" => LeadType::Marina,
        "loja" => LeadType::Loja,
        _ => LeadType::Parceiro,
    }
}

fn as_niche(value: &str) -> Option<Niche> {
    match value {
        "passeios" => Some(Niche::Passeios),
        "aluguel" => Some(Niche::Aluguel),
        "day_use" => Some(Niche::DayUse),
        "servicos" => Some(Niche::Servicos),
        "marina" => Some(Niche::Marina),
        "loja" => Some(Niche::Loja),
        "outro" => Some(Niche::Outro),
        _ => None,
    }
}

fn as_revenue_band(value: &str) -> Option<RevenueBand> {
    match value {
        "prefiro_nao_informar" => Some(RevenueBand::PrefiroNaoInformar),
        "ate_50k_mes" => Some(RevenueBand::Ate50kMes),
        "50k_200k_mes" => Some(RevenueBand::De50kA200kMes),
        "200k_1m_mes" => Some(RevenueBand::De200kA1mMes),
        "acima_1m_mes" => Some(RevenueBand::Acima1mMes),
        _ => None,
    }
}

/// Same acceptance as `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Classic CNPJ check: 14 digits, not all repeated, two mod-11 check digits.
pub fn is_valid_cnpj(input: &str) -> bool {
    let digits: Vec<u32> = digits_only(input)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    if digits.len() != 14 {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    check_digit(&digits, 12) == digits[12] && check_digit(&digits, 13) == digits[13]
}

fn check_digit(digits: &[u32], len: usize) -> u32 {
    let mut sum = 0;
    let mut pos = len as u32 - 7;
    for &digit in &digits[..len] {
        sum += digit * pos;
        pos -= 1;
        if pos < 2 {
            pos = 9;
        }
    }
    let rem = sum % 11;
    if rem < 2 { 0 } else { 11 - rem }
}

fn opt(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Validate a raw submission body.
///
/// Returns the normalized payload or the first rejection reason, in the
/// form's own language.
pub fn validate_lead(body: &Value) -> Result<LeadPayload, String> {
    let lead_id = sanitize(field(body, "leadId"), 64);
    let lead_type = as_lead_type(&sanitize(field(body, "type"), 24));
    let name = sanitize(field(body, "name"), MAX_TEXT);
    let company = sanitize(field(body, "company"), MAX_TEXT);
    let legal_name = sanitize(field(body, "legalName"), MAX_TEXT);
    let company_in_setup = truthy(field(body, "companyInSetup"));
    let cnpj = digits_only(&sanitize(field(body, "cnpj"), 32));
    let email = sanitize(field(body, "email"), MAX_TEXT);
    let phone = sanitize(field(body, "phone"), MAX_TEXT);
    let city = sanitize(field(body, "city"), MAX_TEXT);
    let state = sanitize(field(body, "state"), MAX_TEXT);
    let niche = as_niche(&sanitize(field(body, "niche"), 24));
    let monthly_revenue = as_revenue_band(&sanitize(field(body, "monthlyRevenue"), 32));
    let operating_region = sanitize(field(body, "operatingRegion"), 160);
    let capacity = sanitize(field(body, "capacity"), 120);
    let role = sanitize(field(body, "role"), 80);
    let preferred_contact = if sanitize(field(body, "preferredContact"), 16) == "email" {
        PreferredContact::Email
    } else {
        PreferredContact::Whatsapp
    };
    let message = sanitize(field(body, "message"), 800);
    let website = sanitize(field(body, "website"), 160);
    let honeypot = sanitize(field(body, "honeypot"), 120);

    if lead_id.is_empty() {
        return Err("leadId ausente".to_string());
    }
    if name.is_empty() {
        return Err("nome é obrigatório".to_string());
    }
    if company.is_empty() {
        return Err("empresa é obrigatória".to_string());
    }
    if !company_in_setup {
        if cnpj.is_empty() {
            return Err("cnpj é obrigatório (ou marque “empresa em abertura”)".to_string());
        }
        if !is_valid_cnpj(&cnpj) {
            return Err("cnpj inválido".to_string());
        }
    }
    if !is_valid_email(&email) {
        return Err("email inválido".to_string());
    }

    Ok(LeadPayload {
        lead_id,
        lead_type,
        name,
        company,
        legal_name: opt(legal_name),
        cnpj: opt(cnpj),
        company_in_setup,
        email,
        phone: opt(phone),
        city: opt(city),
        state: opt(state),
        niche,
        monthly_revenue,
        operating_region: opt(operating_region),
        capacity: opt(capacity),
        role: opt(role),
        preferred_contact,
        message: opt(message),
        website: opt(website),
        honeypot,
    })
}
