//! Backend API client

pub mod backend;
pub mod buckets;
pub mod client;
pub mod tables;
pub mod users;
