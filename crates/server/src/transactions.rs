//! Transactions API endpoints

use api_types::transaction::{
    AccountTransactions, AccountTransactionsQuery, CustomerTransactions, TransactionCreated,
    TransactionNew, TransactionView,
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::{ApplyCmd, Transaction, TransactionAction, TransactionListFilter};

use crate::{
    ServerError,
    extract::{Body, PathParam, QueryParams},
    parse_amount,
    server::ServerState,
};

const DEFAULT_PAGE_LIMIT: u64 = 50;
const MAX_PAGE_LIMIT: u64 = 500;

pub(crate) fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        transaction_id: tx.id,
        account_id: tx.account_id,
        branch_id: tx.branch_id,
        amount: tx.amount.to_string(),
        action: tx.action.as_str().to_string(),
        transaction_date: tx.transaction_date,
        processed_by: tx.processed_by,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Body(payload): Body<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let amount = parse_amount(&payload.amount)?;
    let action = TransactionAction::try_from(payload.action.as_str())?;

    let mut cmd = ApplyCmd::new(payload.account_id, payload.branch_id, amount, action);
    if let Some(processed_by) = payload.processed_by {
        cmd = cmd.processed_by(processed_by);
    }
    let applied = state.engine.apply(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            success: true,
            message: format!("{} of {amount} completed successfully", action.as_str()),
            current_balance: applied.current_balance.to_string(),
            transaction: transaction_view(applied.transaction),
        }),
    ))
}

pub async fn list_for_customer(
    State(state): State<ServerState>,
    PathParam(customer_id): PathParam<i32>,
) -> Result<Json<CustomerTransactions>, ServerError> {
    let transactions = state
        .engine
        .list_transactions_for_customer(customer_id)
        .await?
        .into_iter()
        .map(transaction_view)
        .collect();

    Ok(Json(CustomerTransactions {
        success: true,
        customer_id,
        transactions,
    }))
}

pub async fn list_for_account(
    State(state): State<ServerState>,
    PathParam(account_id): PathParam<i32>,
    QueryParams(query): QueryParams<AccountTransactionsQuery>,
) -> Result<Json<AccountTransactions>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT);
    let action = query
        .action
        .as_deref()
        .map(TransactionAction::try_from)
        .transpose()?;
    let filter = TransactionListFilter {
        from: query.from.map(|dt| dt.with_timezone(&Utc)),
        to: query.to.map(|dt| dt.with_timezone(&Utc)),
        action,
    };

    let (txs, next_cursor) = state
        .engine
        .list_transactions_for_account_page(account_id, limit, query.cursor.as_deref(), &filter)
        .await?;

    Ok(Json(AccountTransactions {
        success: true,
        account_id,
        transactions: txs.into_iter().map(transaction_view).collect(),
        next_cursor,
    }))
}
