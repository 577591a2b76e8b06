//! Persisted state.
//!
//! Currently just the [`ledger`] of last-evaluated dependencies.

pub mod ledger;

pub use ledger::{load, load_in_order, save, LedgerEntries};
