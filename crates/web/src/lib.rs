//! MotorTest Web Backend
//!
//! Reference REST backend for the test report client: tool and motor
//! catalogs, protocol field sets and report intake.

pub mod config;
pub mod server;

pub use config::WebConfig;
pub use server::WebServer;
