#![no_main]

use libfuzzer_sys::fuzz_target;

use serde::{Deserialize, Serialize};

use hyperquery_format as f;

#[derive(arbitrary::Arbitrary, PartialEq, Debug, Serialize, Deserialize)]
struct Input {
    addresses: Vec<f::Address>,
    topics: Vec<f::LogArgument>,
    sighash: f::FixedSizeData<4>,
    status: f::TransactionStatus,
}

fuzz_target!(|data: Input| {
    let json = serde_json::to_vec(&data).unwrap();

    let out: Input = serde_json::from_slice(&json).unwrap();

    assert_eq!(out, data);

    let out_json = serde_json::to_vec(&out).unwrap();

    assert_eq!(&json, &out_json);
});
