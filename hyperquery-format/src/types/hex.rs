use crate::Result;

/// Values with a canonical spelling as `0x` prefixed, lowercase hex.
pub trait Hex: Sized {
    fn encode_hex(&self) -> String;

    /// Parses hex in any letter case. Surrounding whitespace is not accepted.
    fn decode_hex(hex: &str) -> Result<Self>;

    /// Respells `hex` canonically, failing wherever [`Hex::decode_hex`] fails.
    fn normalize_hex(hex: &str) -> Result<String> {
        Self::decode_hex(hex).map(|value| value.encode_hex())
    }
}
