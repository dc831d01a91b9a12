use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{Account, EngineError, OpenAccountCmd, ResultEngine, accounts, transactions};

use super::{Engine, with_tx};

impl Engine {
    /// Opens an account for an existing customer.
    ///
    /// The opening balance seeds `current_balance` without creating a
    /// transaction. It is also kept in `opening_balance` so the account can be
    /// reconciled against its ledger later.
    pub async fn open_account(&self, cmd: OpenAccountCmd) -> ResultEngine<Account> {
        if cmd.opening_balance.is_negative() {
            return Err(EngineError::InvalidAmount(
                "opening balance must not be negative".to_string(),
            ));
        }

        let account = with_tx!(self, |db_tx| {
            self.require_customer(&db_tx, cmd.customer_id).await?;

            let model = accounts::ActiveModel {
                customer_id: ActiveValue::Set(cmd.customer_id),
                date_opened: ActiveValue::Set(Utc::now()),
                current_balance: ActiveValue::Set(cmd.opening_balance.cents()),
                opening_balance: ActiveValue::Set(cmd.opening_balance.cents()),
                account_type: ActiveValue::Set(cmd.account_type.as_str().to_string()),
                status: ActiveValue::Set("ACTIVE".to_string()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            Account::try_from(model)
        })?;

        tracing::info!(
            account_id = account.id,
            customer_id = account.customer_id,
            "account opened"
        );
        Ok(account)
    }

    /// Deletes an account together with its transaction history.
    pub async fn close_account(&self, account_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, account_id).await?;

            let removed = transactions::Entity::delete_many()
                .filter(transactions::Column::AccountId.eq(account_id))
                .exec(&db_tx)
                .await?;
            accounts::Entity::delete_by_id(account_id)
                .exec(&db_tx)
                .await?;

            tracing::info!(
                account_id,
                transactions = removed.rows_affected,
                "account closed"
            );
            Ok(())
        })
    }

    pub async fn account(&self, account_id: i32) -> ResultEngine<Account> {
        let model = accounts::Entity::find_by_id(account_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))?;
        Account::try_from(model)
    }

    /// Every account of the bank, ordered by id.
    pub async fn list_accounts(&self) -> ResultEngine<Vec<Account>> {
        accounts::Entity::find()
            .order_by_asc(accounts::Column::AccountId)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    /// Accounts owned by a customer, ordered by id. Unknown customers have none.
    pub async fn list_accounts_for_customer(&self, customer_id: i32) -> ResultEngine<Vec<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::CustomerId.eq(customer_id))
            .order_by_asc(accounts::Column::AccountId)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }
}
