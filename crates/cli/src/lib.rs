//! MotorTest CLI
//!
//! Command-line client for the MotorTest backend: catalog maintenance,
//! protocol field retrieval and test report submission.

pub mod client;
pub mod commands;
pub mod config;
pub mod output;

pub use client::ApiClient;
pub use config::ClientConfig;
