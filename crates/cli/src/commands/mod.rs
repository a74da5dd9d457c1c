//! CLI Commands

pub mod catalog;
pub mod fields;
pub mod motors;
pub mod report;
pub mod templates;
pub mod tools;
