//! Integration tests for the xaheen command routing and dispatch engine

mod alias_resolution;
mod config_integration;
mod dispatch;
mod exit_codes;
mod handler_factory;
mod legacy_lookup;
mod test_utils;
