//! # HyperQuery Format
//!
//! Hex-backed primitive types used to express query predicates.
//!
//! Every value is stored as raw bytes and always printed as lowercase, `0x` prefixed
//! hex. Parsing accepts any letter case, so two spellings of the same address compare
//! equal once decoded.
//!
//! ## Key Types
//!
//! - [`Address`] - 20-byte account or contract address
//! - [`Hash`] - 32-byte block or transaction hash
//! - [`LogArgument`] - 32-byte log topic
//! - [`FixedSizeData`] - generic fixed width byte array behind the aliases above
//! - [`TransactionStatus`] - success/failure code of a transaction
//!
//! ## Example
//!
//! ```
//! use hyperquery_format::Address;
//!
//! let upper: Address = "0x742D35CC6634C0532925A3B8D400ACDCD5C94C33".parse()?;
//! let lower: Address = "0x742d35cc6634c0532925a3b8d400acdcd5c94c33".parse()?;
//! assert_eq!(upper, lower);
//! assert_eq!(upper.to_string(), "0x742d35cc6634c0532925a3b8d400acdcd5c94c33");
//! # Ok::<(), hyperquery_format::Error>(())
//! ```

mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Address, FixedSizeData, Hash, Hex, LogArgument, TransactionStatus};
