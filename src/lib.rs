//! Ascend - level up your life one habit at a time
//!
//! Users track good and bad habits across eight life categories. Completing
//! a habit earns experience in its category and coins; each category levels
//! from 1 to 10 and everything resets once a week. Coins buy "moments" in a
//! weekly shop that restore life lost to bad-habit relapses.
//!
//! ## Layers
//!
//! 1. **Domain** (`domain`): users, habits, categories, moments.
//! 2. **Store** (`store`): versioned documents with optimistic
//!    read-modify-write transactions, backed by SQLite or memory.
//! 3. **Ledger** (`ledger`): the reward rules, each operation a single
//!    all-or-nothing transaction, behind an async facade.

pub mod config;
pub mod domain;
pub mod ledger;
pub mod store;

pub use domain::*;
