use hyperquery_format::FixedSizeData;

/// First four bytes of call input, the function selector.
pub type Sighash = FixedSizeData<4>;
