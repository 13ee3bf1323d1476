//! Subcommand implementations.

pub mod audit;
pub mod config;
pub mod init;
pub mod run;
pub mod schedule;
