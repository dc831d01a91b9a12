//! Accounts API endpoints.

use api_types::{
    Message,
    account::{AccountList, AccountNew, AccountResponse, AccountView, Reconciliation},
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{Account, AccountType, MoneyCents, OpenAccountCmd};

use crate::{
    ServerError,
    extract::{Body, PathParam},
    parse_amount,
    server::ServerState,
};

fn account_view(account: Account) -> AccountView {
    AccountView {
        account_id: account.id,
        customer_id: account.customer_id,
        date_opened: account.date_opened,
        current_balance: account.current_balance.to_string(),
        opening_balance: account.opening_balance.to_string(),
        account_type: account.account_type.as_str().to_string(),
        status: account.status,
    }
}

fn account_list(accounts: Vec<Account>) -> Json<AccountList> {
    Json(AccountList {
        success: true,
        accounts: accounts.into_iter().map(account_view).collect(),
    })
}

pub async fn open(
    State(state): State<ServerState>,
    Body(payload): Body<AccountNew>,
) -> Result<(StatusCode, Json<AccountResponse>), ServerError> {
    let opening_balance = match &payload.current_balance {
        Some(amount) => parse_amount(amount)?,
        None => MoneyCents::ZERO,
    };
    let mut cmd = OpenAccountCmd::new(payload.customer_id, opening_balance);
    if let Some(kind) = payload.account_type.as_deref() {
        cmd = cmd.account_type(AccountType::try_from(kind)?);
    }

    let account = state.engine.open_account(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            success: true,
            message: "Account created successfully".to_string(),
            account: account_view(account),
        }),
    ))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<AccountList>, ServerError> {
    Ok(account_list(state.engine.list_accounts().await?))
}

/// `GET /accounts/{id}`: the id is a customer id.
pub async fn list_for_customer(
    State(state): State<ServerState>,
    PathParam(customer_id): PathParam<i32>,
) -> Result<Json<AccountList>, ServerError> {
    Ok(account_list(
        state.engine.list_accounts_for_customer(customer_id).await?,
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    PathParam(account_id): PathParam<i32>,
) -> Result<Json<AccountResponse>, ServerError> {
    let account = state.engine.account(account_id).await?;
    Ok(Json(AccountResponse {
        success: true,
        message: "Account found".to_string(),
        account: account_view(account),
    }))
}

/// `DELETE /accounts/{id}`: the id is an account id.
pub async fn close(
    State(state): State<ServerState>,
    PathParam(account_id): PathParam<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.close_account(account_id).await?;
    Ok(Json(Message::ok("Account deleted successfully")))
}

pub async fn reconcile(
    State(state): State<ServerState>,
    PathParam(account_id): PathParam<i32>,
) -> Result<Json<Reconciliation>, ServerError> {
    let report = state.engine.reconcile_account(account_id).await?;
    Ok(Json(Reconciliation {
        success: true,
        account_id: report.account_id,
        current_balance: report.current_balance.to_string(),
        opening_balance: report.opening_balance.to_string(),
        ledger_sum: report.ledger_sum.to_string(),
        transactions: report.transactions,
        consistent: report.consistent,
    }))
}
