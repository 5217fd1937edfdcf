//! Wallet ledger engine.
//!
//! The engine owns every wallet balance. It exposes single-wallet mutations
//! (deposit, subtract, refill, enable/disable, set, reset, create-if-absent)
//! and the two-wallet transfer protocol. Every mutation of a wallet runs in
//! that wallet's exclusive section, and transfers commit both wallets in one
//! database transaction.

pub use commands::{Opened, TransferCmd, TransferOutcome};
pub use error::{EngineError, TransferRejection};
pub use ops::{Caller, Engine, EngineBuilder};
pub use policy::WalletPolicy;
pub use wallets::Wallet;

mod commands;
mod error;
mod locks;
mod ops;
mod policy;
mod store;
mod util;
pub mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
