//! Payloads exchanged with the backend API

pub mod settings;
pub mod user;
