//! Authentication module: register, account validation, login

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
