//! Integration tests for sweep-bot.
//!
//! These tests verify the interaction between components:
//! - Worklist construction from balances
//! - Route execution end to end against a simulated venue
//! - Failure recovery and reporting

pub mod common;
