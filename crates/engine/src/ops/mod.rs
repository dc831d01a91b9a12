use sea_orm::{DatabaseConnection, DatabaseTransaction, prelude::*};

use crate::{EngineError, ResultEngine};

mod accounts;
mod branches;
mod customers;
mod ledger;
mod staff;

pub use ledger::{AppliedTransaction, Reconciliation, TransactionListFilter};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// Early returns (`?` or `return Err(..)`) drop the transaction uncommitted,
/// which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$self.database).await?;
        let result: $crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of every bank operation.
///
/// The engine holds no state besides the connection: balances live in the
/// database and are only changed inside database transactions.
#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    async fn require_account(
        &self,
        db: &DatabaseTransaction,
        account_id: i32,
    ) -> ResultEngine<crate::accounts::Model> {
        crate::accounts::Entity::find_by_id(account_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))
    }

    async fn require_branch(
        &self,
        db: &DatabaseTransaction,
        branch_id: i32,
    ) -> ResultEngine<crate::branches::Model> {
        crate::branches::Entity::find_by_id(branch_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("branch not exists".to_string()))
    }

    async fn require_customer(
        &self,
        db: &DatabaseTransaction,
        customer_id: i32,
    ) -> ResultEngine<crate::customers::Model> {
        crate::customers::Entity::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("customer not exists".to_string()))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
