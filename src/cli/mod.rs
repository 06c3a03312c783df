//! Command-line interface
//!
//! This module implements argument parsing and command dispatch for the
//! model-forge binary.

pub mod commands;
