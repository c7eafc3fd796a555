//! Cryptographic helpers

pub mod password;
