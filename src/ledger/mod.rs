//! Ledger module containing transaction, subscription, and debt management

pub mod core;
pub mod debt;
pub mod stats;
pub mod subscription;
pub mod transaction;

pub use self::core::*;
pub use debt::*;
pub use stats::*;
pub use subscription::*;
pub use transaction::*;
