//! HTTP request handlers.

pub mod health;
pub mod orders;
pub mod tokens;
