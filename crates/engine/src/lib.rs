//! Core of the bank: customers, accounts, branches, staff and the transaction
//! ledger, persisted through SeaORM.
//!
//! Every balance change goes through [`Engine::apply`], which updates the
//! account and appends the ledger row in a single database transaction.

pub use accounts::{Account, AccountType};
pub use branches::Branch;
pub use commands::{
    Address, ApplyCmd, CustomerUpdate, NewBranch, NewCustomer, NewStaff, OpenAccountCmd,
    StaffUpdate,
};
pub use customers::Customer;
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{
    AppliedTransaction, Engine, EngineBuilder, Reconciliation, TransactionListFilter,
};
pub use staff::{StaffMember, StaffRole};
pub use transactions::{Transaction, TransactionAction};

mod accounts;
mod branches;
mod commands;
mod customers;
mod error;
mod money;
mod ops;
mod staff;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
