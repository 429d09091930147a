//! Aura command line front end
//!
//! Configuration loading and the command handlers behind the `aura` binary.

pub mod commands;
pub mod config;
pub mod controls;
