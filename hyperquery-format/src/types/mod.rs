mod fixed_size_data;
mod hex;
mod transaction_status;

pub use fixed_size_data::FixedSizeData;
pub use hex::Hex;
pub use transaction_status::TransactionStatus;

/// 32-byte block or transaction hash
pub type Hash = FixedSizeData<32>;

/// 32-byte log topic
pub type LogArgument = FixedSizeData<32>;

/// 20-byte evm address
pub type Address = FixedSizeData<20>;
