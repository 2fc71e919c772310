//! Selectable output columns, one closed set per entity kind.
use crate::block::BlockField;
use crate::log::LogField;
use crate::trace::TraceField;
use crate::transaction::TransactionField;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// The kinds of entity a query can select and return.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Block,
    Transaction,
    Log,
    Trace,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Transaction => "transaction",
            Self::Log => "log",
            Self::Trace => "trace",
        }
    }

    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the singular or plural name in any letter case, e.g. `"Log"` or `"logs"`.
impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        let singular = name.strip_suffix('s').unwrap_or(&name);
        Self::iter()
            .find(|kind| kind.as_str() == singular)
            .ok_or_else(|| Error::InvalidEntityKind(s.to_owned()))
    }
}

/// A column of some entity kind that can be put into a field selection.
pub trait CatalogField:
    Copy + Ord + fmt::Debug + IntoEnumIterator + Into<&'static str> + 'static
{
    const ENTITY: EntityKind;

    /// Every field of this entity kind, in catalog order.
    fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Name of the field on the wire.
    fn name(self) -> &'static str {
        self.into()
    }

    /// Looks up a field by its wire name. Names are case sensitive.
    fn parse(name: &str) -> Result<Self> {
        Self::iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| Error::UnknownField {
                entity: Self::ENTITY,
                field: name.to_owned(),
            })
    }
}

fn names<F: CatalogField>() -> Vec<&'static str> {
    F::iter().map(F::name).collect()
}

/// Wire names of every field that can be selected for `kind`, in catalog order.
pub fn fields_for(kind: EntityKind) -> Vec<&'static str> {
    match kind {
        EntityKind::Block => names::<BlockField>(),
        EntityKind::Transaction => names::<TransactionField>(),
        EntityKind::Log => names::<LogField>(),
        EntityKind::Trace => names::<TraceField>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn assert_wire_names<F: CatalogField + Serialize>() {
        let fields = F::all();
        let names = fields.iter().map(|f| f.name()).collect::<BTreeSet<_>>();
        assert_eq!(names.len(), fields.len(), "duplicate names in {:?}", F::ENTITY);

        for field in fields {
            assert_eq!(
                serde_json::to_value(field).unwrap(),
                serde_json::Value::String(field.name().to_owned())
            );
            assert_eq!(F::parse(field.name()).unwrap(), field);
        }
    }

    #[test]
    fn test_wire_names_match_serde() {
        assert_wire_names::<BlockField>();
        assert_wire_names::<TransactionField>();
        assert_wire_names::<LogField>();
        assert_wire_names::<TraceField>();
    }

    #[test]
    fn test_fields_for_is_stable() {
        for kind in EntityKind::all() {
            assert_eq!(fields_for(kind), fields_for(kind));
            assert!(!fields_for(kind).is_empty());
        }
        assert_eq!(fields_for(EntityKind::Log).len(), 12);
        assert_eq!(fields_for(EntityKind::Log)[0], "Removed");
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            LogField::parse("NotAField"),
            Err(Error::UnknownField {
                entity: EntityKind::Log,
                field: "NotAField".to_owned()
            })
        );
        // case sensitive
        assert!(LogField::parse("address").is_err());
    }

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("log".parse::<EntityKind>().unwrap(), EntityKind::Log);
        assert_eq!(
            "Transactions".parse::<EntityKind>().unwrap(),
            EntityKind::Transaction
        );
        assert_eq!(
            "receipt".parse::<EntityKind>(),
            Err(Error::InvalidEntityKind("receipt".to_owned()))
        );
        assert!("".parse::<EntityKind>().is_err());
    }
}
