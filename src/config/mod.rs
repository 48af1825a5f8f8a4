//! Configuration management
//!
//! Mining parameters and the admission policy for a ledger instance.
//! Values come from defaults, a TOML file, and `LEDGER_*` environment
//! variables, in that order.

pub mod settings;

pub use settings::LedgerConfig;
