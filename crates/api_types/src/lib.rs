use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Monetary amount as sent by clients.
///
/// Both `50`, `50.25` and `"50.25"` are accepted. The server parses the value
/// into exact cents and rejects anything with more than two decimals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(f64),
}

impl Amount {
    /// Decimal text of the amount, ready to be parsed.
    pub fn to_decimal_string(&self) -> String {
        match self {
            Amount::Text(value) => value.trim().to_string(),
            Amount::Number(value) => value.to_string(),
        }
    }
}

/// Plain `{success, message}` reply, also used for every error.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub success: bool,
    pub message: String,
}

impl Message {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub success: bool,
    pub message: String,
    pub version: String,
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: i32,
        pub branch_id: i32,
        /// Must be > 0.
        pub amount: Amount,
        /// Exactly `"Deposit"` or `"Withdraw"`.
        pub action: String,
        /// Username of the staff member handling the request, if any.
        pub processed_by: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub transaction_id: i32,
        pub account_id: i32,
        pub branch_id: i32,
        /// Decimal string with two fractional digits, e.g. `"50.00"`.
        pub amount: String,
        pub action: String,
        pub transaction_date: DateTime<Utc>,
        pub processed_by: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub success: bool,
        pub message: String,
        pub transaction: TransactionView,
        pub current_balance: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerTransactions {
        pub success: bool,
        pub customer_id: i32,
        pub transactions: Vec<TransactionView>,
    }

    /// Query string of `GET /account/{id}/transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountTransactionsQuery {
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
        /// Inclusive lower bound, RFC3339.
        pub from: Option<DateTime<FixedOffset>>,
        /// Exclusive upper bound, RFC3339.
        pub to: Option<DateTime<FixedOffset>>,
        pub action: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountTransactions {
        pub success: bool,
        pub account_id: i32,
        pub transactions: Vec<TransactionView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub customer_id: i32,
        /// Opening balance, defaults to zero.
        pub current_balance: Option<Amount>,
        /// `"SAVINGS"` (default) or `"CURRENT"`.
        pub account_type: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub account_id: i32,
        pub customer_id: i32,
        pub date_opened: DateTime<Utc>,
        pub current_balance: String,
        pub opening_balance: String,
        pub account_type: String,
        pub status: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountResponse {
        pub success: bool,
        pub message: String,
        pub account: AccountView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountList {
        pub success: bool,
        pub accounts: Vec<AccountView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Reconciliation {
        pub success: bool,
        pub account_id: i32,
        pub current_balance: String,
        pub opening_balance: String,
        pub ledger_sum: String,
        pub transactions: u64,
        pub consistent: bool,
    }
}

pub mod customer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub house_no: Option<String>,
        pub city: Option<String>,
        pub zipcode: Option<String>,
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerUpdate {
        pub name: String,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub house_no: Option<String>,
        pub city: Option<String>,
        pub zipcode: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub customer_id: i32,
        pub name: String,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub house_no: Option<String>,
        pub city: Option<String>,
        pub zipcode: Option<String>,
        pub username: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerResponse {
        pub success: bool,
        pub message: String,
        pub customer: CustomerView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerList {
        pub success: bool,
        pub customers: Vec<CustomerView>,
    }
}

pub mod branch {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BranchNew {
        pub name: String,
        pub house_no: Option<String>,
        pub city: Option<String>,
        pub zip_code: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BranchView {
        pub branch_id: i32,
        pub name: String,
        pub house_no: Option<String>,
        pub city: Option<String>,
        pub zip_code: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BranchResponse {
        pub success: bool,
        pub message: String,
        pub branch: BranchView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BranchList {
        pub success: bool,
        pub branches: Vec<BranchView>,
    }
}

pub mod staff {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StaffNew {
        pub username: String,
        pub password: String,
        pub full_name: Option<String>,
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StaffUpdate {
        pub username: String,
        pub full_name: Option<String>,
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StaffView {
        pub staff_id: i32,
        /// `"employee"` or `"manager"`.
        pub role: String,
        pub username: String,
        pub full_name: Option<String>,
        pub email: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StaffResponse {
        pub success: bool,
        pub message: String,
        pub staff: StaffView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StaffList {
        pub success: bool,
        pub staff: Vec<StaffView>,
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerLogin {
        pub success: bool,
        pub message: String,
        /// Always `"customer"`.
        pub role: String,
        pub user: customer::CustomerView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StaffLogin {
        pub success: bool,
        pub message: String,
        pub role: String,
        pub user: staff::StaffView,
    }
}
