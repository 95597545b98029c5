//! Command Handlers Module
//!
//! This module contains handlers for all CLI subcommands.

pub mod identify;
pub mod security;
