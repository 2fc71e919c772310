#![deny(missing_docs)]
//! Query builder engine for HyperSync queries.
//!
//! Wraps the query document of [`hyperquery_net_types`] with an engine that applies named
//! edits, re-validates after each one according to an [`EngineConfig`], and knows which
//! chains serve which data.

mod chains;
mod config;
mod engine;
pub mod preset_query;

pub use hyperquery_format as format;
pub use hyperquery_net_types as net_types;

pub use chains::{Chain, ChainList, TRACES_FEATURE};
pub use config::EngineConfig;
pub use engine::{Edit, QueryEngine, Revision};
