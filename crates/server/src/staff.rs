//! Employee and manager endpoints.
//!
//! Both roles expose the same routes under their own prefix; handlers are
//! generic over a [`RoleScope`] marker so the role is fixed at routing time.

use api_types::{
    Message,
    auth::{Login, StaffLogin},
    staff::{StaffList, StaffNew, StaffResponse, StaffUpdate, StaffView},
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{NewStaff, StaffMember, StaffRole};

use crate::{
    ServerError,
    extract::{Body, PathParam},
    server::ServerState,
};

pub trait RoleScope: Send + Sync + 'static {
    const ROLE: StaffRole;
    /// Capitalized role name used in messages.
    const LABEL: &'static str;
}

pub struct Employees;
pub struct Managers;

impl RoleScope for Employees {
    const ROLE: StaffRole = StaffRole::Employee;
    const LABEL: &'static str = "Employee";
}

impl RoleScope for Managers {
    const ROLE: StaffRole = StaffRole::Manager;
    const LABEL: &'static str = "Manager";
}

fn staff_view(member: StaffMember) -> StaffView {
    StaffView {
        staff_id: member.id,
        role: member.role.as_str().to_string(),
        username: member.username,
        full_name: member.full_name,
        email: member.email,
        created_at: member.created_at,
    }
}

fn staff_response(message: String, member: StaffMember) -> Json<StaffResponse> {
    Json(StaffResponse {
        success: true,
        message,
        staff: staff_view(member),
    })
}

pub async fn create<R: RoleScope>(
    State(state): State<ServerState>,
    Body(payload): Body<StaffNew>,
) -> Result<(StatusCode, Json<StaffResponse>), ServerError> {
    let member = state
        .engine
        .create_staff(NewStaff {
            role: R::ROLE,
            username: payload.username,
            password: payload.password,
            full_name: payload.full_name,
            email: payload.email,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        staff_response(format!("{} added successfully", R::LABEL), member),
    ))
}

pub async fn list<R: RoleScope>(
    State(state): State<ServerState>,
) -> Result<Json<StaffList>, ServerError> {
    let staff = state.engine.staff(R::ROLE).await?;
    Ok(Json(StaffList {
        success: true,
        staff: staff.into_iter().map(staff_view).collect(),
    }))
}

pub async fn get<R: RoleScope>(
    State(state): State<ServerState>,
    PathParam(staff_id): PathParam<i32>,
) -> Result<Json<StaffResponse>, ServerError> {
    let member = state.engine.staff_member(R::ROLE, staff_id).await?;
    Ok(staff_response(format!("{} found", R::LABEL), member))
}

pub async fn update<R: RoleScope>(
    State(state): State<ServerState>,
    PathParam(staff_id): PathParam<i32>,
    Body(payload): Body<StaffUpdate>,
) -> Result<Json<StaffResponse>, ServerError> {
    let member = state
        .engine
        .update_staff(
            R::ROLE,
            staff_id,
            engine::StaffUpdate {
                username: payload.username,
                full_name: payload.full_name,
                email: payload.email,
            },
        )
        .await?;
    Ok(staff_response(
        format!("{} updated successfully", R::LABEL),
        member,
    ))
}

pub async fn delete<R: RoleScope>(
    State(state): State<ServerState>,
    PathParam(staff_id): PathParam<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_staff(R::ROLE, staff_id).await?;
    Ok(Json(Message::ok(format!(
        "{} deleted successfully",
        R::LABEL
    ))))
}

pub async fn login<R: RoleScope>(
    State(state): State<ServerState>,
    Body(payload): Body<Login>,
) -> Result<Json<StaffLogin>, ServerError> {
    let member = state
        .engine
        .authenticate_staff(R::ROLE, &payload.username, &payload.password)
        .await?;
    tracing::info!(staff_id = member.id, role = R::ROLE.as_str(), "staff logged in");

    Ok(Json(StaffLogin {
        success: true,
        message: format!("{} login successful", R::LABEL),
        role: R::ROLE.as_str().to_string(),
        user: staff_view(member),
    }))
}
