//! # EV Reserve
//!
//! Reservation service for physical charging stations grouped by site.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and errors
//! - **application**: Business logic and services (reservation ledger,
//!   station registry, auth, receipts)
//! - **infrastructure**: External concerns (storage, crypto)
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export storage types for easy access
pub use infrastructure::{InMemoryStorage, Storage};

// Re-export API router
pub use interfaces::http::create_api_router;
