use crate::block::{BlockField, BlockSelection};
use crate::catalog::{CatalogField, EntityKind};
use crate::log::{LogField, LogSelection};
use crate::selection::{Selection, SelectionClause};
use crate::trace::{TraceField, TraceSelection};
use crate::transaction::{TransactionField, TransactionSelection};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Copy, Default)]
pub enum JoinMode {
    /// Join in this order logs -> transactions -> traces -> blocks
    #[default]
    Default,
    /// Join everything to everything. For example if logSelection matches log0, we get the
    /// associated transaction of log0 and then we get associated logs of that transaction as well. Applies similarly
    /// to blocks, traces.
    JoinAll,
    /// Join nothing.
    JoinNothing,
}

impl JoinMode {
    pub fn is_default(&self) -> bool {
        *self == Self::Default
    }
}

/// Columns returned for each entity kind. Sets are kept in catalog order so the same
/// selection always serializes the same way.
#[derive(Default, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldSelection {
    pub block: BTreeSet<BlockField>,
    pub transaction: BTreeSet<TransactionField>,
    pub log: BTreeSet<LogField>,
    pub trace: BTreeSet<TraceField>,
}

fn parse_set<F: CatalogField, S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<F>> {
    names.iter().map(|name| F::parse(name.as_ref())).collect()
}

fn toggle<F: CatalogField>(set: &mut BTreeSet<F>, name: &str) -> Result<()> {
    let field = F::parse(name)?;
    if !set.remove(&field) {
        set.insert(field);
    }
    Ok(())
}

fn names<F: CatalogField>(set: &BTreeSet<F>) -> Vec<&'static str> {
    set.iter().map(|f| f.name()).collect()
}

impl FieldSelection {
    /// Every field of every entity kind.
    pub fn all() -> Self {
        Self {
            block: BlockField::all().into_iter().collect(),
            transaction: TransactionField::all().into_iter().collect(),
            log: LogField::all().into_iter().collect(),
            trace: TraceField::all().into_iter().collect(),
        }
    }

    /// Wire names of the fields selected for `kind`.
    pub fn fields(&self, kind: EntityKind) -> Vec<&'static str> {
        match kind {
            EntityKind::Block => names(&self.block),
            EntityKind::Transaction => names(&self.transaction),
            EntityKind::Log => names(&self.log),
            EntityKind::Trace => names(&self.trace),
        }
    }

    pub fn is_empty(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Block => self.block.is_empty(),
            EntityKind::Transaction => self.transaction.is_empty(),
            EntityKind::Log => self.log.is_empty(),
            EntityKind::Trace => self.trace.is_empty(),
        }
    }

    /// Replaces the fields of `kind`. Duplicates collapse, unknown names fail.
    pub fn with_fields<S: AsRef<str>>(&self, kind: EntityKind, fields: &[S]) -> Result<Self> {
        let mut next = self.clone();
        match kind {
            EntityKind::Block => next.block = parse_set(fields)?,
            EntityKind::Transaction => next.transaction = parse_set(fields)?,
            EntityKind::Log => next.log = parse_set(fields)?,
            EntityKind::Trace => next.trace = parse_set(fields)?,
        }
        Ok(next)
    }

    /// Adds `field` to `kind` if it is missing, removes it otherwise.
    pub fn toggled(&self, kind: EntityKind, field: &str) -> Result<Self> {
        let mut next = self.clone();
        match kind {
            EntityKind::Block => toggle(&mut next.block, field)?,
            EntityKind::Transaction => toggle(&mut next.transaction, field)?,
            EntityKind::Log => toggle(&mut next.log, field)?,
            EntityKind::Trace => toggle(&mut next.trace, field)?,
        }
        Ok(next)
    }
}

/// A query against a HyperSync server.
///
/// Edits are made through methods that leave `self` untouched and return the edited
/// document. Call [`QueryDocument::validate`] afterwards to learn about problems that
/// an edit can't reject on its own, such as empty predicate lists.
#[derive(Default, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueryDocument {
    /// The block to start the query from
    pub from_block: u64,
    /// The block to end the query at. If not specified, the query will go until the
    ///  end of data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    /// List of log selections, these have an OR relationship between them, so the query will return logs
    /// that match any of these selections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<LogSelection>>,
    /// List of transaction selections, the query will return transactions that match any of these selections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<TransactionSelection>>,
    /// List of trace selections, the query will return traces that match any of these selections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traces: Option<Vec<TraceSelection>>,
    /// List of block selections, the query will return blocks that match any of these selections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<BlockSelection>>,
    /// Whether to include all blocks regardless of if they are related to a returned transaction or log.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_all_blocks: bool,
    /// Field selection. Requesting less fields will improve query execution time and reduce the payload size.
    pub field_selection: FieldSelection,
    /// Maximum number of blocks that should be returned, the server might return more blocks than this number but
    ///  it won't overshoot by too much.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_blocks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_transactions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_logs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_traces: Option<u64>,
    #[serde(skip_serializing_if = "JoinMode::is_default")]
    pub join_mode: JoinMode,
}

fn remove_at<T>(list: &mut Option<Vec<T>>, entity: EntityKind, index: usize) -> Result<()> {
    let len = list.as_ref().map_or(0, Vec::len);
    let items = list
        .as_mut()
        .filter(|items| index < items.len())
        .ok_or(Error::IndexOutOfRange { entity, index, len })?;
    items.remove(index);
    if items.is_empty() {
        *list = None;
    }
    Ok(())
}

fn replace_at<T>(list: &mut Option<Vec<T>>, entity: EntityKind, index: usize, item: T) -> Result<()> {
    let len = list.as_ref().map_or(0, Vec::len);
    let slot = list
        .as_mut()
        .and_then(|items| items.get_mut(index))
        .ok_or(Error::IndexOutOfRange { entity, index, len })?;
    *slot = item;
    Ok(())
}

fn mismatch(expected: EntityKind, clause: &SelectionClause) -> Error {
    Error::InvalidEntityKind(format!("{} clause given for {expected}", clause.kind()))
}

impl QueryDocument {
    pub fn set_block_range(&self, from_block: i128, to_block: Option<i128>) -> Result<Self> {
        let invalid = || Error::InvalidRange {
            from_block,
            to_block,
        };
        let from = u64::try_from(from_block).map_err(|_| invalid())?;
        let to = match to_block {
            Some(to) => {
                let to = u64::try_from(to).map_err(|_| invalid())?;
                if to < from {
                    return Err(invalid());
                }
                Some(to)
            }
            None => None,
        };

        let mut next = self.clone();
        next.from_block = from;
        next.to_block = to;
        Ok(next)
    }

    /// Appends `clause` to the selections of `kind`. The clause must be of that kind.
    pub fn add_clause(&self, kind: EntityKind, clause: SelectionClause) -> Result<Self> {
        let mut next = self.clone();
        match (kind, clause) {
            (EntityKind::Block, SelectionClause::Block(sel)) => {
                next.blocks.get_or_insert_with(Vec::new).push(sel)
            }
            (EntityKind::Transaction, SelectionClause::Transaction(sel)) => {
                next.transactions.get_or_insert_with(Vec::new).push(sel)
            }
            (EntityKind::Log, SelectionClause::Log(sel)) => {
                next.logs.get_or_insert_with(Vec::new).push(sel)
            }
            (EntityKind::Trace, SelectionClause::Trace(sel)) => {
                next.traces.get_or_insert_with(Vec::new).push(sel)
            }
            (kind, clause) => return Err(mismatch(kind, &clause)),
        }
        Ok(next)
    }

    /// Removes the selection at `index`. Removing the last one leaves the list absent.
    pub fn remove_clause_at(&self, kind: EntityKind, index: usize) -> Result<Self> {
        let mut next = self.clone();
        match kind {
            EntityKind::Block => remove_at(&mut next.blocks, kind, index)?,
            EntityKind::Transaction => remove_at(&mut next.transactions, kind, index)?,
            EntityKind::Log => remove_at(&mut next.logs, kind, index)?,
            EntityKind::Trace => remove_at(&mut next.traces, kind, index)?,
        }
        Ok(next)
    }

    pub fn replace_clause_at(
        &self,
        kind: EntityKind,
        index: usize,
        clause: SelectionClause,
    ) -> Result<Self> {
        let mut next = self.clone();
        match (kind, clause) {
            (EntityKind::Block, SelectionClause::Block(sel)) => {
                replace_at(&mut next.blocks, kind, index, sel)?
            }
            (EntityKind::Transaction, SelectionClause::Transaction(sel)) => {
                replace_at(&mut next.transactions, kind, index, sel)?
            }
            (EntityKind::Log, SelectionClause::Log(sel)) => {
                replace_at(&mut next.logs, kind, index, sel)?
            }
            (EntityKind::Trace, SelectionClause::Trace(sel)) => {
                replace_at(&mut next.traces, kind, index, sel)?
            }
            (kind, clause) => return Err(mismatch(kind, &clause)),
        }
        Ok(next)
    }

    /// Selections of `kind`, in order.
    pub fn clauses(&self, kind: EntityKind) -> Vec<SelectionClause> {
        fn wrap<T: Clone>(list: &Option<Vec<T>>, f: fn(T) -> SelectionClause) -> Vec<SelectionClause> {
            list.iter().flatten().cloned().map(f).collect()
        }
        match kind {
            EntityKind::Block => wrap(&self.blocks, SelectionClause::Block),
            EntityKind::Transaction => wrap(&self.transactions, SelectionClause::Transaction),
            EntityKind::Log => wrap(&self.logs, SelectionClause::Log),
            EntityKind::Trace => wrap(&self.traces, SelectionClause::Trace),
        }
    }

    pub fn clause_count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Block => self.blocks.as_ref().map_or(0, Vec::len),
            EntityKind::Transaction => self.transactions.as_ref().map_or(0, Vec::len),
            EntityKind::Log => self.logs.as_ref().map_or(0, Vec::len),
            EntityKind::Trace => self.traces.as_ref().map_or(0, Vec::len),
        }
    }

    pub fn has_clauses(&self) -> bool {
        EntityKind::all()
            .into_iter()
            .any(|kind| self.clause_count(kind) > 0)
    }

    /// True if at least one clause sets a predicate.
    pub fn has_predicates(&self) -> bool {
        fn any<S: Selection>(list: &Option<Vec<S>>) -> bool {
            list.iter().flatten().any(|sel| !sel.is_empty())
        }
        any(&self.blocks) || any(&self.transactions) || any(&self.logs) || any(&self.traces)
    }

    pub fn set_field_selection<S: AsRef<str>>(&self, kind: EntityKind, fields: &[S]) -> Result<Self> {
        let mut next = self.clone();
        next.field_selection = self.field_selection.with_fields(kind, fields)?;
        Ok(next)
    }

    pub fn toggle_field(&self, kind: EntityKind, field: &str) -> Result<Self> {
        let mut next = self.clone();
        next.field_selection = self.field_selection.toggled(kind, field)?;
        Ok(next)
    }

    /// Sets or clears the maximum number of `kind` entities to return.
    pub fn set_cap(&self, kind: EntityKind, cap: Option<i128>) -> Result<Self> {
        let cap = cap
            .map(|value| {
                u64::try_from(value).map_err(|_| Error::InvalidCap {
                    entity: kind,
                    value,
                })
            })
            .transpose()?;

        let mut next = self.clone();
        match kind {
            EntityKind::Block => next.max_num_blocks = cap,
            EntityKind::Transaction => next.max_num_transactions = cap,
            EntityKind::Log => next.max_num_logs = cap,
            EntityKind::Trace => next.max_num_traces = cap,
        }
        Ok(next)
    }

    pub fn cap(&self, kind: EntityKind) -> Option<u64> {
        match kind {
            EntityKind::Block => self.max_num_blocks,
            EntityKind::Transaction => self.max_num_transactions,
            EntityKind::Log => self.max_num_logs,
            EntityKind::Trace => self.max_num_traces,
        }
    }

    pub fn has_caps(&self) -> bool {
        EntityKind::all()
            .into_iter()
            .any(|kind| self.cap(kind).is_some())
    }

    pub fn set_join_mode(&self, join_mode: JoinMode) -> Self {
        Self {
            join_mode,
            ..self.clone()
        }
    }

    pub fn set_include_all_blocks(&self, include_all_blocks: bool) -> Self {
        Self {
            include_all_blocks,
            ..self.clone()
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::{PredicateKey, PredicateValues, Selection};
    use maplit::btreeset;
    use pretty_assertions::assert_eq;

    fn address_clause(address: &str) -> SelectionClause {
        SelectionClause::Log(
            LogSelection::default()
                .with_predicate(PredicateKey::Address, PredicateValues::text([address]))
                .unwrap(),
        )
    }

    #[test]
    fn test_set_block_range() {
        let doc = QueryDocument::default().set_block_range(100, Some(200)).unwrap();
        assert_eq!((doc.from_block, doc.to_block), (100, Some(200)));

        let open = doc.set_block_range(5, None).unwrap();
        assert_eq!((open.from_block, open.to_block), (5, None));
        assert_eq!(doc.to_block, Some(200));

        assert!(doc.set_block_range(7, Some(7)).is_ok());
    }

    #[test]
    fn test_invalid_ranges() {
        let doc = QueryDocument::default();
        for (from, to) in [(10, Some(9)), (-1, None), (0, Some(-5)), (i128::MAX, Some(0))] {
            assert_eq!(
                doc.set_block_range(from, to),
                Err(Error::InvalidRange {
                    from_block: from,
                    to_block: to
                })
            );
        }
    }

    #[test]
    fn test_add_and_remove_clauses() {
        let doc = QueryDocument::default()
            .add_clause(EntityKind::Log, address_clause("0x0000000000000000000000000000000000000001"))
            .unwrap()
            .add_clause(EntityKind::Log, address_clause("0x0000000000000000000000000000000000000002"))
            .unwrap();
        assert_eq!(doc.clause_count(EntityKind::Log), 2);

        let first_removed = doc.remove_clause_at(EntityKind::Log, 0).unwrap();
        assert_eq!(
            first_removed.clauses(EntityKind::Log),
            vec![address_clause("0x0000000000000000000000000000000000000002")]
        );

        let none_left = first_removed.remove_clause_at(EntityKind::Log, 0).unwrap();
        assert_eq!(none_left.logs, None);
        assert_eq!(
            none_left.remove_clause_at(EntityKind::Log, 0),
            Err(Error::IndexOutOfRange {
                entity: EntityKind::Log,
                index: 0,
                len: 0
            })
        );
        assert_eq!(
            doc.remove_clause_at(EntityKind::Log, 2),
            Err(Error::IndexOutOfRange {
                entity: EntityKind::Log,
                index: 2,
                len: 2
            })
        );
    }

    #[test]
    fn test_clause_kind_must_match() {
        let err = QueryDocument::default()
            .add_clause(EntityKind::Block, SelectionClause::empty(EntityKind::Log))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEntityKind(_)));
    }

    #[test]
    fn test_replace_clause() {
        let doc = QueryDocument::default()
            .add_clause(EntityKind::Log, SelectionClause::empty(EntityKind::Log))
            .unwrap();
        let replaced = doc
            .replace_clause_at(
                EntityKind::Log,
                0,
                address_clause("0x0000000000000000000000000000000000000003"),
            )
            .unwrap();
        assert_eq!(replaced.clause_count(EntityKind::Log), 1);
        assert_ne!(replaced, doc);
        assert!(doc
            .replace_clause_at(EntityKind::Log, 1, SelectionClause::empty(EntityKind::Log))
            .is_err());
    }

    #[test]
    fn test_field_selection() {
        let doc = QueryDocument::default()
            .set_field_selection(EntityKind::Log, &["Data", "Address", "Data"])
            .unwrap();
        assert_eq!(doc.field_selection.log, btreeset! {LogField::Address, LogField::Data});
        assert_eq!(doc.field_selection.fields(EntityKind::Log), vec!["Address", "Data"]);

        for kind in EntityKind::all() {
            assert_eq!(
                doc.set_field_selection(kind, &["NotAField"]),
                Err(Error::UnknownField {
                    entity: kind,
                    field: "NotAField".to_owned()
                })
            );
        }
    }

    #[test]
    fn test_toggle_field() {
        let doc = QueryDocument::default()
            .toggle_field(EntityKind::Block, "Number")
            .unwrap();
        assert_eq!(doc.field_selection.block, btreeset! {BlockField::Number});
        let back = doc.toggle_field(EntityKind::Block, "Number").unwrap();
        assert!(back.field_selection.is_empty(EntityKind::Block));
        assert!(doc.toggle_field(EntityKind::Trace, "Topic0").is_err());
    }

    #[test]
    fn test_caps() {
        let doc = QueryDocument::default()
            .set_cap(EntityKind::Transaction, Some(0))
            .unwrap();
        assert_eq!(doc.max_num_transactions, Some(0));
        assert_eq!(
            doc.set_cap(EntityKind::Transaction, Some(-1)),
            Err(Error::InvalidCap {
                entity: EntityKind::Transaction,
                value: -1
            })
        );
        let cleared = doc.set_cap(EntityKind::Transaction, None).unwrap();
        assert!(!cleared.has_caps());
    }

    #[test]
    fn test_edits_do_not_alias() {
        let doc = QueryDocument::default()
            .add_clause(EntityKind::Log, SelectionClause::empty(EntityKind::Log))
            .unwrap();
        let mut derived = doc.set_join_mode(JoinMode::JoinAll);
        derived.logs.as_mut().unwrap().clear();

        assert_eq!(doc.clause_count(EntityKind::Log), 1);
        assert_eq!(doc.join_mode, JoinMode::Default);
    }
}
