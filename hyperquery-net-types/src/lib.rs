//! HyperQuery network types.
//!
//! The query document a HyperSync server understands, the selection clauses it is built
//! from, the rules that keep it consistent while it is edited, and its JSON wire format.
//!
//! Selections of the same entity kind have an OR relationship: a log is returned if it
//! matches any of the query's log selections. Predicates inside one selection have an AND
//! relationship: a log matches a selection only if it satisfies every predicate that is
//! present. A predicate that is absent does not constrain anything.
//!
//! ```
//! use hyperquery_net_types::{
//!     decode, encode, EntityKind, LogSelection, PredicateKey, PredicateValues, QueryDocument,
//!     Selection, SelectionClause,
//! };
//!
//! let clause = LogSelection::default().with_predicate(
//!     PredicateKey::Address,
//!     PredicateValues::text(["0xdAC17F958D2ee523a2206206994597C13D831ec7"]),
//! )?;
//!
//! let doc = QueryDocument::default()
//!     .set_block_range(18_000_000, Some(18_000_100))?
//!     .add_clause(EntityKind::Log, SelectionClause::Log(clause))?
//!     .set_field_selection(EntityKind::Log, &["Address", "Data"])?;
//!
//! assert!(!doc.validate().has_errors());
//!
//! let json = encode(&doc)?;
//! assert_eq!(decode(&json.to_string())?, doc);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod block;
pub mod catalog;
pub mod error;
pub mod log;
pub mod predicate;
pub mod query;
pub mod selection;
pub mod trace;
pub mod transaction;
pub mod types;
pub mod validate;
pub mod wire;

pub use block::{BlockField, BlockSelection};
pub use catalog::{fields_for, CatalogField, EntityKind};
pub use error::{DecodeError, Error, Result};
pub use log::{LogField, LogSelection};
pub use predicate::{PredicateKey, PredicateValues};
pub use query::{FieldSelection, JoinMode, QueryDocument};
pub use selection::{Selection, SelectionClause};
pub use trace::{TraceField, TraceSelection};
pub use transaction::{AuthorizationSelection, TransactionField, TransactionSelection};
pub use types::Sighash;
pub use validate::{Finding, FindingCode, Findings, Severity, ValidationConfig};
pub use wire::{decode, decode_value, encode, encode_to_string};
