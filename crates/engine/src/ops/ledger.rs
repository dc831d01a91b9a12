use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sea_orm::{
    ActiveValue, Condition, JoinType, QueryFilter, QueryOrder, QuerySelect, prelude::*,
    sea_query::Expr,
};

use crate::{
    ApplyCmd, EngineError, MoneyCents, ResultEngine, Transaction, TransactionAction, accounts,
    transactions, util::normalize_optional,
};

use super::{Engine, with_tx};

/// Outcome of a successful [`Engine::apply`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppliedTransaction {
    pub transaction: Transaction,
    /// Account balance right after this transaction committed.
    pub current_balance: MoneyCents,
}

/// Result of comparing an account's cached balance with its ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub account_id: i32,
    pub current_balance: MoneyCents,
    pub opening_balance: MoneyCents,
    /// Sum of every signed transaction amount for the account.
    pub ledger_sum: MoneyCents,
    /// Number of transactions the sum was computed from.
    pub transactions: u64,
    pub consistent: bool,
}

/// Filters for listing an account's transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, only transactions with this action are returned.
    pub action: Option<TransactionAction>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidField(
            "invalid range: from must be < to".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    transaction_date: DateTime<Utc>,
    transaction_id: i32,
}

impl TransactionsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))
    }
}

impl Engine {
    /// Applies a deposit or a withdrawal to an account.
    ///
    /// The balance change and the new transaction row are written in one
    /// database transaction: either both are committed or neither is.
    ///
    /// - The balance is changed by a single `UPDATE ... SET current_balance =
    ///   current_balance + delta` issued as the first statement, so the store
    ///   takes its write lock before anything is read and concurrent applies on
    ///   the same account are serialized.
    /// - Overdrafts are rejected: a withdrawal only matches the row when
    ///   `current_balance >= amount`, otherwise `InsufficientFunds` is returned
    ///   and nothing is written.
    /// - A deposit that would push the balance past `i64::MAX` cents is
    ///   rejected the same way with `InvalidAmount`.
    pub async fn apply(&self, cmd: ApplyCmd) -> ResultEngine<AppliedTransaction> {
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than 0".to_string(),
            ));
        }
        let processed_by = normalize_optional(cmd.processed_by.as_deref());
        let delta = cmd.action.signed(cmd.amount).cents();

        let applied = with_tx!(self, |db_tx| {
            let mut update = accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::CurrentBalance,
                    Expr::col(accounts::Column::CurrentBalance).add(delta),
                )
                .filter(accounts::Column::AccountId.eq(cmd.account_id));
            update = match cmd.action {
                TransactionAction::Withdraw => {
                    update.filter(accounts::Column::CurrentBalance.gte(cmd.amount.cents()))
                }
                TransactionAction::Deposit => update
                    .filter(accounts::Column::CurrentBalance.lte(i64::MAX - cmd.amount.cents())),
            };

            let updated = update.exec(&db_tx).await?;
            if updated.rows_affected == 0 {
                let account = accounts::Entity::find_by_id(cmd.account_id)
                    .one(&db_tx)
                    .await?;
                return Err(match (account, cmd.action) {
                    (None, _) => EngineError::KeyNotFound("account not exists".to_string()),
                    (Some(account), TransactionAction::Withdraw) => {
                        EngineError::InsufficientFunds(format!(
                            "balance {} is lower than {}",
                            MoneyCents::new(account.current_balance),
                            cmd.amount
                        ))
                    }
                    (Some(_), TransactionAction::Deposit) => EngineError::InvalidAmount(format!(
                        "deposit of {} exceeds the maximum account balance",
                        cmd.amount
                    )),
                });
            }

            self.require_branch(&db_tx, cmd.branch_id).await?;

            let model = transactions::ActiveModel {
                account_id: ActiveValue::Set(cmd.account_id),
                branch_id: ActiveValue::Set(cmd.branch_id),
                amount: ActiveValue::Set(cmd.amount.cents()),
                action: ActiveValue::Set(cmd.action.as_str().to_string()),
                transaction_date: ActiveValue::Set(Utc::now()),
                processed_by: ActiveValue::Set(processed_by),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            let account = self.require_account(&db_tx, cmd.account_id).await?;

            Ok(AppliedTransaction {
                transaction: Transaction::try_from(model)?,
                current_balance: MoneyCents::new(account.current_balance),
            })
        })?;

        tracing::info!(
            account_id = applied.transaction.account_id,
            transaction_id = applied.transaction.id,
            action = applied.transaction.action.as_str(),
            amount = %applied.transaction.amount,
            balance = %applied.current_balance,
            "transaction applied"
        );
        Ok(applied)
    }

    /// Lists every transaction on the accounts owned by a customer.
    ///
    /// Ordered newest first by `(transaction_date DESC, transaction_id DESC)`.
    /// An unknown customer simply has no transactions.
    pub async fn list_transactions_for_customer(
        &self,
        customer_id: i32,
    ) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .join(JoinType::InnerJoin, transactions::Relation::Accounts.def())
            .filter(accounts::Column::CustomerId.eq(customer_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::TransactionId)
            .all(&self.database)
            .await?;

        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Lists the transactions of one account, with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(transaction_date DESC, transaction_id
    /// DESC)`. Returns the page and the cursor of the next one, if any.
    pub async fn list_transactions_for_account_page(
        &self,
        account_id: i32,
        limit: u64,
        cursor: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<(Vec<Transaction>, Option<String>)> {
        validate_list_filter(filter)?;
        if limit == 0 {
            return Err(EngineError::InvalidField(
                "limit must be greater than 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, account_id).await?;

            let mut query = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(account_id))
                .order_by_desc(transactions::Column::TransactionDate)
                .order_by_desc(transactions::Column::TransactionId)
                .limit(limit.saturating_add(1));

            if let Some(cursor) = cursor {
                let cursor = TransactionsCursor::decode(cursor)?;
                query = query.filter(
                    Condition::any()
                        .add(transactions::Column::TransactionDate.lt(cursor.transaction_date))
                        .add(
                            Condition::all()
                                .add(
                                    transactions::Column::TransactionDate
                                        .eq(cursor.transaction_date),
                                )
                                .add(transactions::Column::TransactionId.lt(cursor.transaction_id)),
                        ),
                );
            }
            if let Some(from) = filter.from {
                query = query.filter(transactions::Column::TransactionDate.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(transactions::Column::TransactionDate.lt(to));
            }
            if let Some(action) = filter.action {
                query = query.filter(transactions::Column::Action.eq(action.as_str()));
            }

            let rows = query.all(&db_tx).await?;
            let has_more = rows.len() > limit as usize;

            let out = rows
                .into_iter()
                .take(limit as usize)
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let next_cursor = match out.last() {
                Some(tx) if has_more => Some(
                    TransactionsCursor {
                        transaction_date: tx.transaction_date,
                        transaction_id: tx.id,
                    }
                    .encode()?,
                ),
                _ => None,
            };

            Ok((out, next_cursor))
        })
    }

    /// Recomputes an account's balance from its ledger and compares it with
    /// the cached `current_balance`. Read-only.
    pub async fn reconcile_account(&self, account_id: i32) -> ResultEngine<Reconciliation> {
        let reconciliation = with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, account_id).await?;
            let models = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(account_id))
                .all(&db_tx)
                .await?;

            let count = models.len() as u64;
            let mut ledger_sum = MoneyCents::ZERO;
            for model in models {
                let tx = Transaction::try_from(model)?;
                ledger_sum = ledger_sum.checked_add(tx.signed_amount()).ok_or_else(|| {
                    EngineError::InvalidAmount("ledger sum overflow".to_string())
                })?;
            }

            let current_balance = MoneyCents::new(account.current_balance);
            let opening_balance = MoneyCents::new(account.opening_balance);
            Ok(Reconciliation {
                account_id,
                current_balance,
                opening_balance,
                ledger_sum,
                transactions: count,
                consistent: opening_balance.checked_add(ledger_sum) == Some(current_balance),
            })
        })?;

        if !reconciliation.consistent {
            tracing::warn!(
                account_id,
                current = %reconciliation.current_balance,
                ledger = %reconciliation.ledger_sum,
                "account balance does not match its ledger"
            );
        }
        Ok(reconciliation)
    }
}
