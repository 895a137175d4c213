//! Core data models for the fin-tracker aggregate
//!
//! This module contains all the data structures persisted in the aggregate
//! document: accounts, transactions, categories, fixed expenses, and goals,
//! plus the canonical Money and strict date representations.

pub mod account;
pub mod app_data;
pub mod category;
pub mod date;
pub mod fixed_expense;
pub mod goal;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountType};
pub use app_data::{AppData, SCHEMA_VERSION};
pub use category::Category;
pub use fixed_expense::FixedExpense;
pub use goal::Goal;
pub use money::Money;
pub use transaction::{Transaction, TransactionType};
