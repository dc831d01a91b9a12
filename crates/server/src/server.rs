use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};

use std::{net::SocketAddr, sync::Arc, time::Instant};

use crate::{
    accounts, branches, customers, index,
    staff::{self, Employees, Managers, RoleScope},
    transactions,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%method, %path, status = status.as_u16(), elapsed_ms, "request failed");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), elapsed_ms, "request");
    }
    response
}

fn staff_routes<R: RoleScope>(router: Router<ServerState>, base: &str) -> Router<ServerState> {
    router
        .route(base, get(staff::list::<R>).post(staff::create::<R>))
        .route(&format!("{base}/login"), post(staff::login::<R>))
        .route(
            &format!("{base}/{{staff_id}}"),
            get(staff::get::<R>)
                .put(staff::update::<R>)
                .delete(staff::delete::<R>),
        )
}

/// Builds the HTTP router over an engine.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    let router = Router::new()
        .route("/", get(index::index))
        .route("/health", get(index::health))
        .route("/transaction", post(transactions::create))
        .route(
            "/transaction/{customer_id}",
            get(transactions::list_for_customer),
        )
        .route("/accounts", get(accounts::list).post(accounts::open))
        .route(
            "/accounts/{id}",
            get(accounts::list_for_customer).delete(accounts::close),
        )
        .route("/account/{account_id}", get(accounts::get))
        .route(
            "/account/{account_id}/transactions",
            get(transactions::list_for_account),
        )
        .route("/account/{account_id}/reconcile", get(accounts::reconcile))
        .route("/customer", get(customers::list).post(customers::create))
        .route("/customer/login", post(customers::login))
        .route(
            "/customer/username/{username}",
            get(customers::get_by_username),
        )
        .route(
            "/customer/{customer_id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/branch", get(branches::list).post(branches::create))
        .route(
            "/branch/{branch_id}",
            get(branches::get)
                .put(branches::update)
                .delete(branches::delete),
        );

    let router = staff_routes::<Employees>(router, "/employee");
    let router = staff_routes::<Managers>(router, "/manager");

    router
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

pub async fn run(engine: Engine, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
