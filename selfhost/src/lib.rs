//! Self-hosting installer
//!
//! Serves a prebuilt frontend, publishes its runtime config module and
//! provisions the backend project behind it on `POST /install`.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod installer;
pub mod logs;
pub mod models;
pub mod server;
pub mod storage;
pub mod utils;
