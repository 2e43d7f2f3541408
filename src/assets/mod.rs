//! Custodied asset handling
//!
//! - [`ledger`]: the balance/transfer provider the vault consumes, plus an
//!   in-memory implementation
//! - [`executor`]: moves the base currency and an explicit token list
//! - [`discovery`]: finds non-zero token balances from a candidate catalog
//!
//! # Example
//!
//! ```ignore
//! use heir_vault::assets::{AssetTransferExecutor, BaseAmount, InMemoryLedger};
//!
//! let mut ledger = InMemoryLedger::new();
//! let mut executor = AssetTransferExecutor::new(&mut ledger, vault);
//! let (report, _events) = executor.execute(&heir, BaseAmount::All, &[usdc])?;
//! ```

pub mod discovery;
pub mod executor;
pub mod ledger;

pub use discovery::{discover, format_units, TokenBalanceEntry};
pub use executor::{AssetTransferExecutor, BaseAmount, ExecutorError, TokenTransfer, TransferReport};
pub use ledger::{Asset, AssetLedger, InMemoryLedger, LedgerError, TokenMetadata, TransferEvent};
