use hyperquery_net_types::{
    DecodeError, EntityKind, Error, FindingCode, Findings, JoinMode, QueryDocument, Result,
    SelectionClause, ValidationConfig,
};
use serde_json::Value;

use crate::chains::Chain;
use crate::config::EngineConfig;

/// A single change to a query document, as produced by a user interface.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Edit {
    /// See [`QueryDocument::set_block_range`].
    SetBlockRange {
        from_block: i128,
        to_block: Option<i128>,
    },
    /// See [`QueryDocument::add_clause`].
    AddClause {
        kind: EntityKind,
        clause: SelectionClause,
    },
    /// See [`QueryDocument::remove_clause_at`].
    RemoveClause { kind: EntityKind, index: usize },
    /// See [`QueryDocument::replace_clause_at`].
    ReplaceClause {
        kind: EntityKind,
        index: usize,
        clause: SelectionClause,
    },
    /// See [`QueryDocument::set_field_selection`].
    SetFieldSelection {
        kind: EntityKind,
        fields: Vec<String>,
    },
    /// See [`QueryDocument::toggle_field`].
    ToggleField { kind: EntityKind, field: String },
    /// See [`QueryDocument::set_cap`].
    SetCap { kind: EntityKind, cap: Option<i128> },
    /// See [`QueryDocument::set_join_mode`].
    SetJoinMode(JoinMode),
    /// See [`QueryDocument::set_include_all_blocks`].
    SetIncludeAllBlocks(bool),
}

impl Edit {
    /// Applies the edit without validating the result.
    pub fn apply_to(&self, doc: &QueryDocument) -> Result<QueryDocument> {
        match self {
            Self::SetBlockRange {
                from_block,
                to_block,
            } => doc.set_block_range(*from_block, *to_block),
            Self::AddClause { kind, clause } => doc.add_clause(*kind, clause.clone()),
            Self::RemoveClause { kind, index } => doc.remove_clause_at(*kind, *index),
            Self::ReplaceClause {
                kind,
                index,
                clause,
            } => doc.replace_clause_at(*kind, *index, clause.clone()),
            Self::SetFieldSelection { kind, fields } => {
                doc.set_field_selection(*kind, fields.as_slice())
            }
            Self::ToggleField { kind, field } => doc.toggle_field(*kind, field),
            Self::SetCap { kind, cap } => doc.set_cap(*kind, *cap),
            Self::SetJoinMode(mode) => Ok(doc.set_join_mode(*mode)),
            Self::SetIncludeAllBlocks(value) => Ok(doc.set_include_all_blocks(*value)),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::SetBlockRange { .. } => "set_block_range",
            Self::AddClause { .. } => "add_clause",
            Self::RemoveClause { .. } => "remove_clause",
            Self::ReplaceClause { .. } => "replace_clause",
            Self::SetFieldSelection { .. } => "set_field_selection",
            Self::ToggleField { .. } => "toggle_field",
            Self::SetCap { .. } => "set_cap",
            Self::SetJoinMode(_) => "set_join_mode",
            Self::SetIncludeAllBlocks(_) => "set_include_all_blocks",
        }
    }
}

/// A document together with everything validation found in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    /// The edited document.
    pub document: QueryDocument,
    /// Findings of validating `document` with the engine's config.
    pub findings: Findings,
}

impl Revision {
    /// True if the document can be encoded.
    pub fn is_valid(&self) -> bool {
        !self.findings.has_errors()
    }
}

/// Applies edits to query documents and re-validates them according to its config.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    validation: ValidationConfig,
    deny_warnings: bool,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl QueryEngine {
    /// Creates an engine, filling in defaults for everything `cfg` leaves out.
    pub fn new(cfg: EngineConfig) -> Self {
        Self {
            validation: ValidationConfig {
                warn_on_unconstrained: cfg.warn_on_unconstrained.unwrap_or(true),
                warn_on_all_blocks_only: cfg.warn_on_all_blocks_only.unwrap_or(true),
            },
            deny_warnings: cfg.deny_warnings.unwrap_or(false),
        }
    }

    /// Validates `doc` with the engine's config.
    pub fn validate(&self, doc: &QueryDocument) -> Findings {
        let findings = doc.validate_with(&self.validation);
        log::trace!(
            "validation found {} errors and {} warnings",
            findings.errors().count(),
            findings.warnings().count()
        );
        findings
    }

    /// Applies `edit` to `doc` and validates the result. `doc` itself is never changed.
    ///
    /// Fails only if the edit is rejected outright. A document that the edit left in an
    /// invalid state is returned with its findings.
    pub fn apply(&self, doc: &QueryDocument, edit: Edit) -> Result<Revision> {
        let document = edit.apply_to(doc).map_err(|e| {
            log::debug!("rejected {} edit: {}", edit.name(), e);
            e
        })?;
        log::debug!("applied {} edit", edit.name());
        let findings = self.validate(&document);
        Ok(Revision { document, findings })
    }

    /// Applies edits in order, stopping at the first rejected one.
    pub fn apply_all(
        &self,
        doc: &QueryDocument,
        edits: impl IntoIterator<Item = Edit>,
    ) -> Result<Revision> {
        let mut document = doc.clone();
        for edit in edits {
            document = edit.apply_to(&document)?;
            log::debug!("applied {} edit", edit.name());
        }
        let findings = self.validate(&document);
        Ok(Revision { document, findings })
    }

    /// Validates `doc` for a specific chain, which adds a warning if traces are requested
    /// from a chain that doesn't serve them.
    pub fn validate_for_chain(&self, doc: &QueryDocument, chain: &Chain) -> Findings {
        let mut findings = self.validate(doc);
        if chain.supports_traces() {
            return findings;
        }
        if doc.clause_count(EntityKind::Trace) > 0 {
            findings.warning(
                FindingCode::TracesUnavailable,
                "traces",
                format!("{} doesn't serve traces, trace selections will match nothing.", chain.name),
            );
        }
        if !doc.field_selection.is_empty(EntityKind::Trace) {
            findings.warning(
                FindingCode::TracesUnavailable,
                "fieldSelection.trace",
                format!("{} doesn't serve traces, no trace fields will be returned.", chain.name),
            );
        }
        findings
    }

    /// Encodes `doc` into its wire JSON. In strict mode warnings block encoding as well.
    pub fn encode(&self, doc: &QueryDocument) -> Result<Value> {
        let findings = self.validate(doc);
        if findings.has_errors() || (self.deny_warnings && findings.has_warnings()) {
            log::debug!("refusing to encode query with {} findings", findings.len());
            return Err(Error::Invalid(findings));
        }
        hyperquery_net_types::encode(doc)
    }

    /// Same as [`QueryEngine::encode`], rendered as a string.
    pub fn encode_to_string(&self, doc: &QueryDocument) -> Result<String> {
        self.encode(doc).map(|value| value.to_string())
    }

    /// Decodes a saved query. The returned revision carries the remaining warnings.
    pub fn decode(&self, json: &str) -> std::result::Result<Revision, DecodeError> {
        let document = hyperquery_net_types::decode(json).map_err(|e| {
            log::debug!("failed to decode query: {}", e);
            e
        })?;
        log::debug!("decoded query from block {}", document.from_block);
        let findings = self.validate(&document);
        Ok(Revision { document, findings })
    }
}
