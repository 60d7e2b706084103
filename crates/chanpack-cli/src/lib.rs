//! chanpack CLI library.
//!
//! This crate provides the command implementations behind the `chanpack`
//! binary: packing, unpacking, and template management.

pub mod commands;
pub mod config;
pub mod logging;
