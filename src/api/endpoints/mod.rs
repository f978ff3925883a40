//! API endpoint handlers, one module per screen or feature.

pub mod assessment;
pub mod automation;
pub mod dashboard;
pub mod export;
pub mod health;
pub mod prescriptions;
pub mod templates;
