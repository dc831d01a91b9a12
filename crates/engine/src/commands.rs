//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use crate::{AccountType, MoneyCents, StaffRole, TransactionAction};

/// Apply a deposit or withdrawal to an account.
#[derive(Clone, Debug)]
pub struct ApplyCmd {
    pub account_id: i32,
    pub branch_id: i32,
    pub amount: MoneyCents,
    pub action: TransactionAction,
    pub processed_by: Option<String>,
}

impl ApplyCmd {
    #[must_use]
    pub fn new(
        account_id: i32,
        branch_id: i32,
        amount: MoneyCents,
        action: TransactionAction,
    ) -> Self {
        Self {
            account_id,
            branch_id,
            amount,
            action,
            processed_by: None,
        }
    }

    #[must_use]
    pub fn deposit(account_id: i32, branch_id: i32, amount: MoneyCents) -> Self {
        Self::new(account_id, branch_id, amount, TransactionAction::Deposit)
    }

    #[must_use]
    pub fn withdraw(account_id: i32, branch_id: i32, amount: MoneyCents) -> Self {
        Self::new(account_id, branch_id, amount, TransactionAction::Withdraw)
    }

    #[must_use]
    pub fn processed_by(mut self, username: impl Into<String>) -> Self {
        self.processed_by = Some(username.into());
        self
    }
}

/// Open a new account for an existing customer.
#[derive(Clone, Debug)]
pub struct OpenAccountCmd {
    pub customer_id: i32,
    pub opening_balance: MoneyCents,
    pub account_type: AccountType,
}

impl OpenAccountCmd {
    #[must_use]
    pub fn new(customer_id: i32, opening_balance: MoneyCents) -> Self {
        Self {
            customer_id,
            opening_balance,
            account_type: AccountType::default(),
        }
    }

    #[must_use]
    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }
}

/// Postal address fields shared by customers and branches.
#[derive(Clone, Debug, Default)]
pub struct Address {
    pub house_no: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Address,
    pub username: String,
    pub password: String,
}

/// Profile fields a customer can change. Credentials are not editable here.
#[derive(Clone, Debug)]
pub struct CustomerUpdate {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Address,
}

#[derive(Clone, Debug)]
pub struct NewBranch {
    pub name: String,
    pub address: Address,
}

#[derive(Clone, Debug)]
pub struct NewStaff {
    pub role: StaffRole,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StaffUpdate {
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}
