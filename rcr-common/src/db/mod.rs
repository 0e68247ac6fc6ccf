//! Database layer shared across RCR services

pub mod init;
pub mod models;

pub use init::init_database;
