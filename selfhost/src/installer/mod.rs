//! Install orchestration

pub mod install;
pub mod profile;
pub mod request;
pub mod steps;
