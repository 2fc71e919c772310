//! This crate is simply a re-export of the crates that make up the HyperSync query builder.
//!
//! Find the query engine, chain list and preset queries in `hyperquery-builder`, hex primitives
//! (Address, Hash, etc) in `hyperquery-format`, and the query document with its wire format in
//! `hyperquery-net-types`.

pub use hyperquery_builder as builder;
pub use hyperquery_format as format;
pub use hyperquery_net_types as net_types;
