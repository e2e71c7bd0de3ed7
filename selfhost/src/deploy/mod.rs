//! Running the backend CLI

pub mod cli;
pub mod command;
pub mod runner;
