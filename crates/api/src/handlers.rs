//! HTTP endpoints.

pub mod health;
pub mod leads;
