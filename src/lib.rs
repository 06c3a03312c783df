//! model-forge Library
//!
//! This is the library interface for model-forge.
//! The main binary is in src/main.rs.

pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod store;
pub mod sync;
