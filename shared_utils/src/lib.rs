//! Small helpers shared by the workspace crates: environment lookups and
//! `.env` loading.

pub mod config;
pub mod env;
