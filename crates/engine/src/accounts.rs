//! The module contains `Account` struct and its database entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

/// Kind of account a customer can open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    #[default]
    Savings,
    Current,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Savings => "SAVINGS",
            Self::Current => "CURRENT",
        }
    }
}

impl TryFrom<&str> for AccountType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "SAVINGS" => Ok(Self::Savings),
            "CURRENT" => Ok(Self::Current),
            other => Err(EngineError::InvalidField(format!(
                "invalid account type: {other}"
            ))),
        }
    }
}

/// A customer account.
///
/// `current_balance` is a cache of `opening_balance` plus every signed
/// transaction applied to the account. Only the ledger apply routine writes
/// it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i32,
    pub customer_id: i32,
    pub date_opened: DateTime<Utc>,
    pub current_balance: MoneyCents,
    pub opening_balance: MoneyCents,
    pub account_type: AccountType,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub account_id: i32,
    pub customer_id: i32,
    pub date_opened: DateTimeUtc,
    pub current_balance: i64,
    pub opening_balance: i64,
    pub account_type: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::CustomerId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Customers,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.account_id,
            customer_id: model.customer_id,
            date_opened: model.date_opened,
            current_balance: MoneyCents::new(model.current_balance),
            opening_balance: MoneyCents::new(model.opening_balance),
            account_type: AccountType::try_from(model.account_type.as_str())?,
            status: model.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_round_trips_through_storage_name() {
        for kind in [AccountType::Savings, AccountType::Current] {
            assert_eq!(AccountType::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(AccountType::try_from("savings").is_err());
    }
}
