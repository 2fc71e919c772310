//! Preset queries for common use cases.
use std::collections::BTreeSet;

use arrayvec::ArrayVec;
use hyperquery_format::{Address, LogArgument};
use hyperquery_net_types::{
    BlockField, CatalogField, FieldSelection, LogField, LogSelection, QueryDocument,
    TransactionField, TransactionSelection,
};

fn all<F: CatalogField>() -> BTreeSet<F> {
    F::all().into_iter().collect()
}

/// Returns a query for all Blocks and Transactions within the block range [from_block, to_block).
/// If to_block is None then query runs to the head of the chain.
/// Note: this is only for quickstart purposes.  For the best performance, create a custom query
/// that only includes the fields you'll use in `field_selection`.
pub fn blocks_and_transactions(from_block: u64, to_block: Option<u64>) -> QueryDocument {
    QueryDocument {
        from_block,
        to_block,
        include_all_blocks: true,
        transactions: Some(vec![TransactionSelection::default()]),
        field_selection: FieldSelection {
            block: all(),
            transaction: all(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Returns a query object for all Blocks and hashes of the Transactions within the block range
/// [from_block, to_block).  Also returns the block_hash and block_number fields on each Transaction
/// so it can be mapped to a block.  If to_block is None then query runs to the head of the chain.
pub fn blocks_and_transaction_hashes(from_block: u64, to_block: Option<u64>) -> QueryDocument {
    let tx_field_selection = BTreeSet::from([
        TransactionField::BlockHash,
        TransactionField::BlockNumber,
        TransactionField::Hash,
    ]);

    QueryDocument {
        from_block,
        to_block,
        include_all_blocks: true,
        transactions: Some(vec![TransactionSelection::default()]),
        field_selection: FieldSelection {
            block: all::<BlockField>(),
            transaction: tx_field_selection,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Returns a query object for all Logs within the block range [from_block, to_block) from
/// the given address.  If to_block is None then query runs to the head of the chain.
pub fn logs(from_block: u64, to_block: Option<u64>, contract_address: Address) -> QueryDocument {
    QueryDocument {
        from_block,
        to_block,
        logs: Some(vec![LogSelection {
            address: Some(vec![contract_address]),
            ..Default::default()
        }]),
        field_selection: FieldSelection {
            log: all::<LogField>(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Returns a query for all Logs within the block range [from_block, to_block) from the
/// given address with a matching topic0 event signature.  Topic0 is the keccak256 hash
/// of the event signature.  If to_block is None then query runs to the head of the chain.
pub fn logs_of_event(
    from_block: u64,
    to_block: Option<u64>,
    topic0: LogArgument,
    contract_address: Address,
) -> QueryDocument {
    let mut topics = ArrayVec::<Vec<LogArgument>, 4>::new();
    topics.push(vec![topic0]);

    QueryDocument {
        from_block,
        to_block,
        logs: Some(vec![LogSelection {
            address: Some(vec![contract_address]),
            topics: Some(topics),
        }]),
        field_selection: FieldSelection {
            log: all::<LogField>(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Returns a query object for all transactions within the block range [from_block, to_block).
/// If to_block is None then query runs to the head of the chain.
pub fn transactions(from_block: u64, to_block: Option<u64>) -> QueryDocument {
    QueryDocument {
        from_block,
        to_block,
        transactions: Some(vec![TransactionSelection::default()]),
        field_selection: FieldSelection {
            transaction: all::<TransactionField>(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Returns a query object for all transactions from an address within the block range
/// [from_block, to_block).  If to_block is None then query runs to the head of the chain.
pub fn transactions_from_address(
    from_block: u64,
    to_block: Option<u64>,
    address: Address,
) -> QueryDocument {
    QueryDocument {
        from_block,
        to_block,
        transactions: Some(vec![TransactionSelection {
            from: Some(vec![address]),
            ..Default::default()
        }]),
        field_selection: FieldSelection {
            transaction: all::<TransactionField>(),
            ..Default::default()
        },
        ..Default::default()
    }
}
