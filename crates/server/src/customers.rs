//! Customer directory and customer login.

use api_types::{
    Message,
    auth::{CustomerLogin, Login},
    customer::{CustomerList, CustomerNew, CustomerResponse, CustomerUpdate, CustomerView},
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{Address, Customer};

use crate::{
    ServerError,
    extract::{Body, PathParam},
    server::ServerState,
};

fn customer_view(customer: Customer) -> CustomerView {
    CustomerView {
        customer_id: customer.id,
        name: customer.name,
        phone: customer.phone,
        email: customer.email,
        house_no: customer.house_no,
        city: customer.city,
        zipcode: customer.zipcode,
        username: customer.username,
        created_at: customer.created_at,
    }
}

fn customer_response(message: &str, customer: Customer) -> Json<CustomerResponse> {
    Json(CustomerResponse {
        success: true,
        message: message.to_string(),
        customer: customer_view(customer),
    })
}

pub async fn create(
    State(state): State<ServerState>,
    Body(payload): Body<CustomerNew>,
) -> Result<(StatusCode, Json<CustomerResponse>), ServerError> {
    let customer = state
        .engine
        .create_customer(engine::NewCustomer {
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            address: Address {
                house_no: payload.house_no,
                city: payload.city,
                zipcode: payload.zipcode,
            },
            username: payload.username,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        customer_response("Customer added successfully", customer),
    ))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<CustomerList>, ServerError> {
    let customers = state.engine.customers().await?;
    Ok(Json(CustomerList {
        success: true,
        customers: customers.into_iter().map(customer_view).collect(),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    PathParam(customer_id): PathParam<i32>,
) -> Result<Json<CustomerResponse>, ServerError> {
    let customer = state.engine.customer(customer_id).await?;
    Ok(customer_response("Customer found", customer))
}

pub async fn get_by_username(
    State(state): State<ServerState>,
    PathParam(username): PathParam<String>,
) -> Result<Json<CustomerResponse>, ServerError> {
    let customer = state.engine.customer_by_username(&username).await?;
    Ok(customer_response("Customer found", customer))
}

pub async fn update(
    State(state): State<ServerState>,
    PathParam(customer_id): PathParam<i32>,
    Body(payload): Body<CustomerUpdate>,
) -> Result<Json<CustomerResponse>, ServerError> {
    let customer = state
        .engine
        .update_customer(
            customer_id,
            engine::CustomerUpdate {
                name: payload.name,
                phone: payload.phone,
                email: payload.email,
                address: Address {
                    house_no: payload.house_no,
                    city: payload.city,
                    zipcode: payload.zipcode,
                },
            },
        )
        .await?;
    Ok(customer_response("Customer updated successfully", customer))
}

pub async fn delete(
    State(state): State<ServerState>,
    PathParam(customer_id): PathParam<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_customer(customer_id).await?;
    Ok(Json(Message::ok("Customer deleted successfully")))
}

pub async fn login(
    State(state): State<ServerState>,
    Body(payload): Body<Login>,
) -> Result<Json<CustomerLogin>, ServerError> {
    let customer = state
        .engine
        .authenticate_customer(&payload.username, &payload.password)
        .await?;
    tracing::info!(customer_id = customer.id, "customer logged in");

    Ok(Json(CustomerLogin {
        success: true,
        message: "Customer login successful".to_string(),
        role: "customer".to_string(),
        user: customer_view(customer),
    }))
}
