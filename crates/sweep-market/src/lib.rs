//! Market graph and route search for the balance sweep bot.
//!
//! Builds a directed conversion graph from one venue snapshot and finds
//! the highest-yield acyclic path between two currencies:
//! - `MarketSnapshot`: currencies, trade pairs, and quotes from the venue
//! - `MarketGraph`: two directed edges per open, liquid pair
//! - `find_route`: depth-bounded exhaustive DFS

pub mod error;
pub mod graph;
pub mod router;
pub mod snapshot;

pub use error::{MarketError, Result};
pub use graph::{CurrencyNode, Edge, MarketGraph};
pub use router::{find_route, RouteParams};
pub use snapshot::{Currency, MarketQuote, MarketSnapshot, TradePair};
