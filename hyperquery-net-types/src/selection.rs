use crate::block::BlockSelection;
use crate::catalog::EntityKind;
use crate::log::LogSelection;
use crate::predicate::{PredicateKey, PredicateValues};
use crate::trace::TraceSelection;
use crate::transaction::TransactionSelection;
use crate::validate::Findings;
use crate::{Error, Result};
use serde::Serialize;

pub(crate) fn unsupported<S: Selection>(key: PredicateKey) -> Error {
    Error::UnknownPredicate {
        selection: S::NAME,
        predicate: key.as_str().to_owned(),
    }
}

/// A group of predicates that all have to hold for an entity to match.
///
/// Editing methods never touch `self`, they return the edited copy.
pub trait Selection: Clone + Default {
    /// Name used in error messages.
    const NAME: &'static str;
    /// Keys this selection accepts.
    const PREDICATES: &'static [PredicateKey];

    fn supports(key: PredicateKey) -> bool {
        Self::PREDICATES.contains(&key)
    }

    /// Sets `key` to `values`, replacing whatever the clause had for it.
    fn with_predicate(&self, key: PredicateKey, values: PredicateValues) -> Result<Self> {
        if !Self::supports(key) {
            return Err(unsupported::<Self>(key));
        }
        let mut next = self.clone();
        next.set_predicate(key, values)?;
        Ok(next)
    }

    /// Same as [`Selection::with_predicate`] with the key given by its wire name.
    fn with_named_predicate(&self, name: &str, values: PredicateValues) -> Result<Self> {
        let key = PredicateKey::parse(name).ok_or_else(|| Error::UnknownPredicate {
            selection: Self::NAME,
            predicate: name.to_owned(),
        })?;
        self.with_predicate(key, values)
    }

    /// Returns a copy with `key` absent, so it no longer constrains anything.
    fn remove_predicate(&self, key: PredicateKey) -> Result<Self> {
        if !Self::supports(key) {
            return Err(unsupported::<Self>(key));
        }
        let mut next = self.clone();
        next.clear_predicate(key);
        Ok(next)
    }

    fn has_predicate(&self, key: PredicateKey) -> bool;

    /// True if no predicate is set, so the clause matches every entity of its kind.
    fn is_empty(&self) -> bool {
        Self::PREDICATES.iter().all(|&key| !self.has_predicate(key))
    }

    /// In-place assignment behind [`Selection::with_predicate`].
    fn set_predicate(&mut self, key: PredicateKey, values: PredicateValues) -> Result<()>;

    fn clear_predicate(&mut self, key: PredicateKey);

    /// Reports predicates that can never match (empty lists) and values that didn't go
    /// through normalisation (repeats, unnormalised labels).
    fn collect_findings(&self, path: &str, findings: &mut Findings);
}

/// A selection of any entity kind.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum SelectionClause {
    Block(BlockSelection),
    Transaction(TransactionSelection),
    Log(LogSelection),
    Trace(TraceSelection),
}

macro_rules! dispatch {
    ($clause:expr, $sel:ident => $body:expr) => {
        match $clause {
            SelectionClause::Block($sel) => $body.map(SelectionClause::Block),
            SelectionClause::Transaction($sel) => $body.map(SelectionClause::Transaction),
            SelectionClause::Log($sel) => $body.map(SelectionClause::Log),
            SelectionClause::Trace($sel) => $body.map(SelectionClause::Trace),
        }
    };
}

impl SelectionClause {
    /// A clause without predicates, matching every entity of `kind`.
    pub fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Block => Self::Block(BlockSelection::default()),
            EntityKind::Transaction => Self::Transaction(TransactionSelection::default()),
            EntityKind::Log => Self::Log(LogSelection::default()),
            EntityKind::Trace => Self::Trace(TraceSelection::default()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Block(_) => EntityKind::Block,
            Self::Transaction(_) => EntityKind::Transaction,
            Self::Log(_) => EntityKind::Log,
            Self::Trace(_) => EntityKind::Trace,
        }
    }

    pub fn with_predicate(&self, key: PredicateKey, values: PredicateValues) -> Result<Self> {
        dispatch!(self, sel => sel.with_predicate(key, values))
    }

    pub fn with_named_predicate(&self, name: &str, values: PredicateValues) -> Result<Self> {
        dispatch!(self, sel => sel.with_named_predicate(name, values))
    }

    pub fn remove_predicate(&self, key: PredicateKey) -> Result<Self> {
        dispatch!(self, sel => sel.remove_predicate(key))
    }

    pub fn has_predicate(&self, key: PredicateKey) -> bool {
        match self {
            Self::Block(sel) => sel.has_predicate(key),
            Self::Transaction(sel) => sel.has_predicate(key),
            Self::Log(sel) => sel.has_predicate(key),
            Self::Trace(sel) => sel.has_predicate(key),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Block(sel) => sel.is_empty(),
            Self::Transaction(sel) => sel.is_empty(),
            Self::Log(sel) => sel.is_empty(),
            Self::Trace(sel) => sel.is_empty(),
        }
    }
}
