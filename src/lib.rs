//! swissgit: batch Git and GitHub chores over one repository or a folder of them.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod services;
