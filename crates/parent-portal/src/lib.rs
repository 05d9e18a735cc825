//! Domain library for the parent portal backend.
//!
//! The heart of the crate is [`workflows::scheduling`]: lesson eligibility
//! classification, the change-option policy, and makeup-slot resolution over
//! the course catalog. Everything else is plumbing around it.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
