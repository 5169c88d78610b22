//! Authenticated venue REST client for the balance sweep bot.
//!
//! - `ExchangeApi`: the capability contract consumed by the executor and
//!   orchestrator
//! - `HttpExchangeClient`: the signed, paced, retrying implementation
//! - `Credentials`: key handling for the venue's "amx" signature scheme

pub mod api;
pub mod auth;
pub mod client;
pub mod error;

pub use api::{Balance, ExchangeApi, OrderId};
pub use auth::Credentials;
pub use client::HttpExchangeClient;
pub use error::{ClientError, Result};
