
pub mod auth;
pub mod health;
pub mod reservations;
pub mod sites;
pub mod stations;
