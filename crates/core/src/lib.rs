//! swissgit Core - Pure domain logic with no git, HTTP or terminal dependencies
//!
//! This crate contains the domain types, the ports (interfaces) and the batch
//! orchestrator shared by every swissgit subcommand. Repository access,
//! hosting API calls and console rendering live in adapters in the main crate.

pub mod app;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for ergonomics
pub use domain::*;
pub use error::*;
