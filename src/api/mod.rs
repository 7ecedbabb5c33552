//! API clients for external services
//!
//! - Backend: the tracker's show, search, grab, log and task endpoints

pub mod backend;

pub use backend::{BackendClient, GatewayError, DEFAULT_BASE_URL};
