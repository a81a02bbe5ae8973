//! Core engine for the myfin personal-finance backend.
//!
//! The engine owns every balance mutation: transaction amounts are folded
//! into a two-level tree of cash counters (one root plus children per user),
//! either immediately or through a batched sweep of unapplied rows. The API
//! layer on top of this crate authenticates, validates payloads and forwards
//! the resolved owner id; the engine never trusts an id without scoping the
//! query to that owner.

pub use attachments::{AssetStore, BlobStore, DEFAULT_CATEGORIES};
pub use bank_aliases::BankAlias;
pub use categories::TransactionCategory;
pub use commands::{NewReceipt, NewTransaction, NewUser, TimeFrame};
pub use counters::CashCounter;
pub use error::EngineError;
pub use money::Amount;
pub use ops::{Engine, EngineBuilder};
pub use receipts::Receipt;
pub use transactions::BankTransaction;
pub use users::User;

mod attachments;
mod bank_aliases;
mod categories;
mod commands;
mod counters;
mod error;
mod money;
mod ops;
mod receipts;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
