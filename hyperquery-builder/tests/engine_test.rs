use std::env::temp_dir;

use hyperquery_builder::{
    net_types::{
        EntityKind, Error, FindingCode, JoinMode, LogField, PredicateKey, PredicateValues,
        QueryDocument, SelectionClause,
    },
    preset_query, ChainList, Edit, EngineConfig, QueryEngine,
};
use maplit::btreeset;
use pretty_assertions::assert_eq;
use serde_json::json;

const ADDRESS: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn log_clause(address: &str) -> SelectionClause {
    SelectionClause::empty(EntityKind::Log)
        .with_predicate(PredicateKey::Address, PredicateValues::text([address]))
        .unwrap()
}

#[test]
fn test_build_and_encode_log_query() {
    init_logger();
    let engine = QueryEngine::default();

    let rev = engine
        .apply_all(
            &QueryDocument::default(),
            [
                Edit::SetBlockRange {
                    from_block: 100,
                    to_block: Some(200),
                },
                Edit::AddClause {
                    kind: EntityKind::Log,
                    clause: log_clause(ADDRESS),
                },
                Edit::SetFieldSelection {
                    kind: EntityKind::Log,
                    fields: vec!["Address".to_owned(), "Data".to_owned()],
                },
            ],
        )
        .unwrap();

    assert!(rev.is_valid());
    assert!(rev.findings.is_empty());
    assert_eq!(
        rev.document.field_selection.log,
        btreeset! {LogField::Address, LogField::Data}
    );
    assert_eq!(
        engine.encode(&rev.document).unwrap(),
        json!({
            "fromBlock": 100,
            "toBlock": 200,
            "logs": [{"address": [ADDRESS.to_lowercase()]}],
            "fieldSelection": {
                "block": [],
                "transaction": [],
                "log": ["Address", "Data"],
                "trace": []
            }
        })
    );
}

#[test]
fn test_negative_cap_is_rejected() {
    init_logger();
    let engine = QueryEngine::default();
    let doc = QueryDocument::default();

    let err = engine
        .apply(
            &doc,
            Edit::SetCap {
                kind: EntityKind::Transaction,
                cap: Some(-1),
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        Error::InvalidCap {
            entity: EntityKind::Transaction,
            value: -1
        }
    );
}

#[test]
fn test_decode_unknown_field() {
    init_logger();
    let engine = QueryEngine::default();
    let err = engine
        .decode(r#"{"fromBlock": 1, "fieldSelection": {"log": ["NotAField"]}}"#)
        .unwrap_err();
    assert_eq!(
        err.query_error(),
        Some(&Error::UnknownField {
            entity: EntityKind::Log,
            field: "NotAField".to_owned()
        })
    );
}

#[test]
fn test_edits_do_not_touch_input() {
    let engine = QueryEngine::default();
    let first = engine
        .apply(
            &QueryDocument::default(),
            Edit::AddClause {
                kind: EntityKind::Log,
                clause: log_clause(ADDRESS),
            },
        )
        .unwrap()
        .document;
    let second = engine
        .apply(
            &first,
            Edit::RemoveClause {
                kind: EntityKind::Log,
                index: 0,
            },
        )
        .unwrap();

    assert_eq!(first.clause_count(EntityKind::Log), 1);
    assert_eq!(second.document.logs, None);
    assert_eq!(second.findings.codes(), vec![FindingCode::Unconstrained]);
}

#[test]
fn test_clause_without_predicates_warns() {
    let engine = QueryEngine::default();
    let rev = engine
        .apply(
            &QueryDocument::default(),
            Edit::AddClause {
                kind: EntityKind::Log,
                clause: SelectionClause::empty(EntityKind::Log),
            },
        )
        .unwrap();
    assert!(rev.is_valid());
    assert_eq!(rev.findings.codes(), vec![FindingCode::Unconstrained]);

    let capped = engine
        .apply(
            &rev.document,
            Edit::SetCap {
                kind: EntityKind::Log,
                cap: Some(1000),
            },
        )
        .unwrap();
    assert!(capped.findings.is_empty());
}

#[test]
fn test_block_range_at_u64_max() {
    let engine = QueryEngine::default();
    let rev = engine
        .apply_all(
            &QueryDocument::default(),
            [
                Edit::SetBlockRange {
                    from_block: u64::MAX.into(),
                    to_block: None,
                },
                Edit::AddClause {
                    kind: EntityKind::Log,
                    clause: log_clause(ADDRESS),
                },
            ],
        )
        .unwrap();
    let decoded = engine
        .decode(&engine.encode_to_string(&rev.document).unwrap())
        .unwrap();
    assert_eq!(decoded.document.from_block, u64::MAX);
    assert_eq!(decoded, rev);

    let err = engine
        .apply(
            &QueryDocument::default(),
            Edit::SetBlockRange {
                from_block: i128::from(u64::MAX) + 1,
                to_block: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));
}

#[test]
fn test_invalid_document_is_kept_with_findings() {
    let engine = QueryEngine::default();
    let empty_topics = SelectionClause::empty(EntityKind::Log)
        .with_predicate(PredicateKey::Topics, PredicateValues::TopicSlots(vec![]))
        .unwrap();
    let rev = engine
        .apply(
            &QueryDocument::default(),
            Edit::AddClause {
                kind: EntityKind::Log,
                clause: empty_topics,
            },
        )
        .unwrap();

    assert!(!rev.is_valid());
    assert_eq!(rev.findings.errors().next().unwrap().path, "logs[0].topics");
    assert!(matches!(
        engine.encode(&rev.document),
        Err(Error::Invalid(findings)) if findings.has_errors()
    ));
}

#[test]
fn test_strict_mode_blocks_warnings() {
    let lenient = QueryEngine::default();
    let strict = QueryEngine::new(EngineConfig {
        deny_warnings: Some(true),
        ..Default::default()
    });
    let doc = QueryDocument::default()
        .set_include_all_blocks(true)
        .set_join_mode(JoinMode::JoinNothing);

    assert!(lenient.encode(&doc).is_ok());
    match strict.encode(&doc) {
        Err(Error::Invalid(findings)) => {
            assert_eq!(findings.codes(), vec![FindingCode::AllBlocksOnly])
        }
        other => panic!("unexpected {other:?}"),
    }

    let quiet = QueryEngine::new(EngineConfig {
        deny_warnings: Some(true),
        warn_on_all_blocks_only: Some(false),
        ..Default::default()
    });
    assert!(quiet.encode_to_string(&doc).is_ok());
}

#[test]
fn test_config_from_file() {
    let path = temp_dir().join(format!("{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, r#"{"deny_warnings": true}"#).unwrap();
    let cfg = EngineConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(cfg.deny_warnings, Some(true));
    assert_eq!(cfg.warn_on_unconstrained, None);
    assert!(QueryEngine::new(cfg)
        .encode(&QueryDocument::default())
        .is_err());

    let missing = temp_dir().join(format!("{}.json", uuid::Uuid::new_v4()));
    assert!(EngineConfig::from_json_file(missing).is_err());
}

#[test]
fn test_trace_preset_on_chains() {
    init_logger();
    let chains = ChainList::from_json(
        r#"[{"name": "eth", "chain_id": 1}, {"name": "eth-traces", "chain_id": 11}]"#,
    )
    .unwrap();
    let engine = QueryEngine::default();
    let doc = engine
        .apply(
            &preset_query::transactions_from_address(0, Some(10), ADDRESS.parse().unwrap()),
            Edit::ToggleField {
                kind: EntityKind::Trace,
                field: "CallType".to_owned(),
            },
        )
        .unwrap()
        .document;

    let plain = engine.validate_for_chain(&doc, chains.by_name("eth").unwrap());
    assert_eq!(plain.codes(), vec![FindingCode::TracesUnavailable]);
    assert_eq!(plain.warnings().next().unwrap().path, "fieldSelection.trace");

    let traced = engine.validate_for_chain(&doc, chains.get(11).unwrap());
    assert!(traced.is_empty());
}

#[test]
fn test_decode_round_trip_keeps_warnings() {
    let engine = QueryEngine::default();
    let rev = engine
        .decode(r#"{"fromBlock": 5, "includeAllBlocks": true, "fieldSelection": {"block": ["Number"]}}"#)
        .unwrap();
    assert_eq!(rev.findings.codes(), vec![FindingCode::AllBlocksOnly]);
    assert_eq!(
        engine.decode(&engine.encode_to_string(&rev.document).unwrap()).unwrap(),
        rev
    );
}
