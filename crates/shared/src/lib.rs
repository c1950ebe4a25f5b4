//! Shared types for the leads API: wire payloads and the lead validator.

pub mod api;
pub mod validate;
