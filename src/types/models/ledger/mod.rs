pub mod transaction_kind;
pub mod transaction_status;

pub use transaction_kind::TransactionKind;
pub use transaction_status::TransactionStatus;
