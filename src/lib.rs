//! Xaheen: command routing and dispatch
//!
//! Maps `xaheen <domain> <action> [target] [--options]`, short aliases and
//! legacy command spellings onto lazily constructed domain handlers.

pub mod alias;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod route;
