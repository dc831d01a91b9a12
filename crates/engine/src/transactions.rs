//! Ledger transaction primitives.
//!
//! A `Transaction` is an immutable record of one deposit or withdrawal. The
//! amount is always stored unsigned; the sign comes from the
//! [`TransactionAction`].

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionAction {
    Deposit,
    Withdraw,
}

impl TransactionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdraw => "Withdraw",
        }
    }

    /// Returns the balance delta produced by applying `amount` with this
    /// action.
    pub fn signed(self, amount: MoneyCents) -> MoneyCents {
        match self {
            Self::Deposit => amount,
            Self::Withdraw => -amount,
        }
    }
}

impl TryFrom<&str> for TransactionAction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Deposit" => Ok(Self::Deposit),
            "Withdraw" => Ok(Self::Withdraw),
            other => Err(EngineError::InvalidAction(format!(
                "{other:?}, must be Deposit or Withdraw"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: i32,
    pub account_id: i32,
    pub branch_id: i32,
    pub amount: MoneyCents,
    pub action: TransactionAction,
    pub transaction_date: DateTime<Utc>,
    pub processed_by: Option<String>,
}

impl Transaction {
    /// Signed effect of this transaction on its account balance.
    pub fn signed_amount(&self) -> MoneyCents {
        self.action.signed(self.amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub transaction_id: i32,
    pub account_id: i32,
    pub branch_id: i32,
    pub amount: i64,
    pub action: String,
    pub transaction_date: DateTimeUtc,
    pub processed_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::AccountId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::BranchId",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Branches,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::branches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.transaction_id,
            account_id: model.account_id,
            branch_id: model.branch_id,
            amount: MoneyCents::new(model.amount),
            action: TransactionAction::try_from(model.action.as_str())?,
            transaction_date: model.transaction_date,
            processed_by: model.processed_by,
        })
    }
}
