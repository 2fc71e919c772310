#![no_main]

use libfuzzer_sys::fuzz_target;

use hyperquery_net_types::{decode, encode_to_string};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(doc) = decode(json) else {
        return;
    };

    // anything that decodes is valid, so it has to encode and decode to the same document
    let encoded = encode_to_string(&doc).unwrap();
    assert_eq!(decode(&encoded).unwrap(), doc);
});
