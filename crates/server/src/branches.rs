use api_types::{
    Message,
    branch::{BranchList, BranchNew, BranchResponse, BranchView},
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{Address, Branch, NewBranch};

use crate::{
    ServerError,
    extract::{Body, PathParam},
    server::ServerState,
};

fn branch_view(branch: Branch) -> BranchView {
    BranchView {
        branch_id: branch.id,
        name: branch.name,
        house_no: branch.house_no,
        city: branch.city,
        zip_code: branch.zip_code,
        created_at: branch.created_at,
    }
}

fn new_branch(payload: BranchNew) -> NewBranch {
    NewBranch {
        name: payload.name,
        address: Address {
            house_no: payload.house_no,
            city: payload.city,
            zipcode: payload.zip_code,
        },
    }
}

fn branch_response(message: &str, branch: Branch) -> Json<BranchResponse> {
    Json(BranchResponse {
        success: true,
        message: message.to_string(),
        branch: branch_view(branch),
    })
}

pub async fn create(
    State(state): State<ServerState>,
    Body(payload): Body<BranchNew>,
) -> Result<(StatusCode, Json<BranchResponse>), ServerError> {
    let branch = state.engine.create_branch(new_branch(payload)).await?;
    Ok((
        StatusCode::CREATED,
        branch_response("Branch added successfully", branch),
    ))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<BranchList>, ServerError> {
    let branches = state.engine.branches().await?;
    Ok(Json(BranchList {
        success: true,
        branches: branches.into_iter().map(branch_view).collect(),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    PathParam(branch_id): PathParam<i32>,
) -> Result<Json<BranchResponse>, ServerError> {
    let branch = state.engine.branch(branch_id).await?;
    Ok(branch_response("Branch found", branch))
}

pub async fn update(
    State(state): State<ServerState>,
    PathParam(branch_id): PathParam<i32>,
    Body(payload): Body<BranchNew>,
) -> Result<Json<BranchResponse>, ServerError> {
    let branch = state
        .engine
        .update_branch(branch_id, new_branch(payload))
        .await?;
    Ok(branch_response("Branch updated successfully", branch))
}

pub async fn delete(
    State(state): State<ServerState>,
    PathParam(branch_id): PathParam<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_branch(branch_id).await?;
    Ok(Json(Message::ok("Branch deleted successfully")))
}
