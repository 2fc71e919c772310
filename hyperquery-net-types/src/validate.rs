//! Findings about a query document.
//!
//! Validation never stops at the first problem and never changes the document. Findings
//! tagged [`Severity::Error`] make a document unusable, [`Severity::Warning`] ones only
//! point at something that is likely unintended.
use crate::predicate::PredicateKey;
use crate::query::QueryDocument;
use crate::selection::Selection;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCode {
    /// `toBlock` is lower than `fromBlock`.
    InvalidRange,
    /// A list is present but has no members, so nothing can match it.
    EmptyList,
    /// A value was assigned without going through predicate normalisation, e.g. a
    /// repeated entry or an upper-case label. Such a document doesn't survive a round trip.
    NotNormalized,
    /// No predicate anywhere and no caps.
    Unconstrained,
    /// `includeAllBlocks` without any selection.
    AllBlocksOnly,
    /// Traces are requested from a chain that doesn't serve them.
    TracesUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub code: FindingCode,
    /// Location in wire notation, e.g. `logs[0].address`. Empty for the whole document.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.severity, self.message)
        } else {
            write!(f, "{} at {}: {}", self.severity, self.path, self.message)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Findings(Vec<Finding>);

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.0.push(finding);
    }

    pub fn error(&mut self, code: FindingCode, path: impl Into<String>, message: impl Into<String>) {
        self.push(Finding {
            severity: Severity::Error,
            code,
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn warning(
        &mut self,
        code: FindingCode,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Finding {
            severity: Severity::Warning,
            code,
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: Findings) {
        self.0.extend(other.0);
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.0.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.0.iter().filter(|f| f.severity == Severity::Warning)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.0.iter()
    }

    pub fn codes(&self) -> Vec<FindingCode> {
        self.0.iter().map(|f| f.code).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Finding> {
        self.0
    }
}

impl fmt::Display for Findings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.0 {
            writeln!(f, "{finding}")?;
        }
        Ok(())
    }
}

impl IntoIterator for Findings {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Which advisory checks run. Errors are always reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    pub warn_on_unconstrained: bool,
    pub warn_on_all_blocks_only: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            warn_on_unconstrained: true,
            warn_on_all_blocks_only: true,
        }
    }
}

pub(crate) fn check_not_empty<T>(
    findings: &mut Findings,
    path: &str,
    key: PredicateKey,
    list: Option<&[T]>,
) {
    if list.is_some_and(|l| l.is_empty()) {
        findings.error(
            FindingCode::EmptyList,
            format!("{path}.{key}"),
            format!("\"{key}\" is an empty list and can never match. Remove it to match any value."),
        );
    }
}

pub(crate) fn check_unique<T: Eq + Hash>(findings: &mut Findings, path: &str, list: &[T]) {
    let mut seen = HashSet::with_capacity(list.len());
    if !list.iter().all(|item| seen.insert(item)) {
        findings.error(
            FindingCode::NotNormalized,
            path,
            "List contains repeated values.",
        );
    }
}

/// Empty and repeated values of a predicate list.
pub(crate) fn check_list<T: Eq + Hash>(
    findings: &mut Findings,
    path: &str,
    key: PredicateKey,
    list: Option<&[T]>,
) {
    check_not_empty(findings, path, key, list);
    if let Some(list) = list {
        check_unique(findings, &format!("{path}.{key}"), list);
    }
}

/// Like [`check_list`], and every label has to be trimmed and lower-cased.
pub(crate) fn check_labels(
    findings: &mut Findings,
    path: &str,
    key: PredicateKey,
    labels: Option<&[String]>,
) {
    check_list(findings, path, key, labels);
    for label in labels.into_iter().flatten() {
        if label.is_empty() || *label != label.trim().to_lowercase() {
            findings.error(
                FindingCode::NotNormalized,
                format!("{path}.{key}"),
                format!("Label \"{label}\" must be non-blank, trimmed and lower-case."),
            );
        }
    }
}

fn check_clauses<S: Selection>(findings: &mut Findings, name: &str, clauses: Option<&[S]>) {
    let Some(clauses) = clauses else {
        return;
    };
    if clauses.is_empty() {
        findings.error(
            FindingCode::EmptyList,
            name,
            format!("\"{name}\" is an empty list. Remove it or add a selection."),
        );
    }
    for (i, clause) in clauses.iter().enumerate() {
        clause.collect_findings(&format!("{name}[{i}]"), findings);
    }
}

impl QueryDocument {
    /// Runs every check with the default [`ValidationConfig`].
    pub fn validate(&self) -> Findings {
        self.validate_with(&ValidationConfig::default())
    }

    pub fn validate_with(&self, config: &ValidationConfig) -> Findings {
        let mut findings = Findings::new();

        if let Some(to_block) = self.to_block {
            if to_block < self.from_block {
                findings.error(
                    FindingCode::InvalidRange,
                    "toBlock",
                    format!(
                        "toBlock {} is lower than fromBlock {}.",
                        to_block, self.from_block
                    ),
                );
            }
        }

        check_clauses(&mut findings, "logs", self.logs.as_deref());
        check_clauses(&mut findings, "transactions", self.transactions.as_deref());
        check_clauses(&mut findings, "traces", self.traces.as_deref());
        check_clauses(&mut findings, "blocks", self.blocks.as_deref());

        if !self.has_clauses() && self.include_all_blocks {
            if config.warn_on_all_blocks_only {
                findings.warning(
                    FindingCode::AllBlocksOnly,
                    "",
                    "No selections are set, the query returns every block in the range and nothing else.",
                );
            }
        } else if !self.has_predicates() && !self.has_caps() && config.warn_on_unconstrained {
            findings.warning(
                FindingCode::Unconstrained,
                "",
                "Query has no predicates and no caps, every selection matches everything.",
            );
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        EntityKind, LogSelection, PredicateValues, SelectionClause, TraceSelection,
        TransactionSelection,
    };
    use pretty_assertions::assert_eq;

    fn log_clause() -> SelectionClause {
        SelectionClause::Log(
            LogSelection::default()
                .with_predicate(
                    PredicateKey::Address,
                    PredicateValues::text(["0x0000000000000000000000000000000000000001"]),
                )
                .unwrap(),
        )
    }

    #[test]
    fn test_default_document_is_unconstrained() {
        let findings = QueryDocument::default().validate();
        assert!(!findings.has_errors());
        assert_eq!(findings.codes(), vec![FindingCode::Unconstrained]);
    }

    #[test]
    fn test_cap_silences_unconstrained() {
        let doc = QueryDocument::default()
            .set_cap(EntityKind::Block, Some(10))
            .unwrap();
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_all_blocks_only_is_a_warning() {
        let doc = QueryDocument::default()
            .set_include_all_blocks(true)
            .set_field_selection(EntityKind::Block, &["Number"])
            .unwrap();
        let findings = doc.validate();
        assert_eq!(findings.codes(), vec![FindingCode::AllBlocksOnly]);
        assert!(!findings.has_errors());

        let quiet = doc.validate_with(&ValidationConfig {
            warn_on_unconstrained: true,
            warn_on_all_blocks_only: false,
        });
        assert!(quiet.is_empty());
    }

    #[test]
    fn test_absent_vs_empty() {
        let absent = QueryDocument::default()
            .add_clause(EntityKind::Transaction, SelectionClause::empty(EntityKind::Transaction))
            .unwrap();
        assert!(!absent.validate().has_errors());

        let empty = QueryDocument::default()
            .add_clause(
                EntityKind::Transaction,
                SelectionClause::Transaction(
                    TransactionSelection::default()
                        .with_predicate(PredicateKey::From, PredicateValues::text(Vec::<String>::new()))
                        .unwrap(),
                ),
            )
            .unwrap();
        let findings = empty.validate();
        assert!(findings.has_errors());
        let error = findings.errors().next().unwrap();
        assert_eq!(error.code, FindingCode::EmptyList);
        assert_eq!(error.path, "transactions[0].from_");
    }

    #[test]
    fn test_nested_authorization_empty_list() {
        let tx = TransactionSelection {
            authorization_list: Some(vec![crate::AuthorizationSelection {
                chain_id: Some(vec![]),
                address: None,
            }]),
            ..Default::default()
        };
        let doc = QueryDocument {
            transactions: Some(vec![tx]),
            ..Default::default()
        };
        let paths = doc.validate().errors().map(|f| f.path.clone()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["transactions[0].authorizationList[0].chainId"]);
    }

    #[test]
    fn test_findings_accumulate() {
        let doc = QueryDocument {
            from_block: 10,
            to_block: Some(5),
            logs: Some(vec![]),
            blocks: Some(vec![crate::BlockSelection {
                hash: Some(vec![]),
                miner: Some(vec![]),
            }]),
            ..Default::default()
        };
        let findings = doc.validate();
        assert_eq!(
            findings.codes(),
            vec![
                FindingCode::InvalidRange,
                FindingCode::EmptyList,
                FindingCode::EmptyList,
                FindingCode::EmptyList,
            ]
        );
        assert_eq!(findings.warnings().count(), 0);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let doc = QueryDocument::default()
            .add_clause(EntityKind::Log, log_clause())
            .unwrap();
        assert_eq!(doc.validate(), doc.validate());
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_clause_without_predicates_is_unconstrained() {
        let doc = QueryDocument::default()
            .add_clause(EntityKind::Log, SelectionClause::empty(EntityKind::Log))
            .unwrap();
        assert_eq!(doc.validate().codes(), vec![FindingCode::Unconstrained]);

        let capped = doc.set_cap(EntityKind::Log, Some(100)).unwrap();
        assert!(capped.validate().is_empty());

        let constrained = doc
            .add_clause(EntityKind::Log, log_clause())
            .unwrap();
        assert!(constrained.validate().is_empty());
    }

    #[test]
    fn test_empty_clause_list_reports_error_and_warning() {
        let doc = QueryDocument {
            logs: Some(vec![]),
            ..Default::default()
        };
        let findings = doc.validate();
        assert_eq!(
            findings.errors().map(|f| f.code).collect::<Vec<_>>(),
            vec![FindingCode::EmptyList]
        );
        assert_eq!(
            findings.warnings().map(|f| f.code).collect::<Vec<_>>(),
            vec![FindingCode::Unconstrained]
        );
    }

    #[test]
    fn test_unnormalized_values_are_errors() {
        let doc = QueryDocument {
            traces: Some(vec![TraceSelection {
                call_type: Some(vec!["CALL".to_owned(), "CALL".to_owned()]),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let findings = doc.validate();
        assert!(findings.has_errors());
        assert!(findings
            .errors()
            .all(|f| f.code == FindingCode::NotNormalized && f.path == "traces[0].callType"));

        let normalized = QueryDocument::default()
            .add_clause(
                EntityKind::Trace,
                SelectionClause::empty(EntityKind::Trace)
                    .with_predicate(PredicateKey::CallType, PredicateValues::text(["CALL", "call"]))
                    .unwrap(),
            )
            .unwrap();
        assert!(normalized.validate().is_empty());
    }

    #[test]
    fn test_repeated_topic_in_slot() {
        let topic = hyperquery_format::LogArgument::default();
        let mut topics = arrayvec::ArrayVec::new();
        topics.push(vec![]);
        topics.push(vec![topic.clone(), topic]);
        let doc = QueryDocument {
            logs: Some(vec![LogSelection {
                address: None,
                topics: Some(topics),
            }]),
            ..Default::default()
        };
        let paths = doc.validate().errors().map(|f| f.path.clone()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["logs[0].topics[1]"]);
    }
}
