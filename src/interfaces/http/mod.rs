//! HTTP REST API interfaces
//!
//! - `common`: response envelope and error mapping
//! - `modules`: request handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::create_api_router;
