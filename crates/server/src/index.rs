use api_types::{Health, ServiceInfo};
use axum::Json;

pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        success: true,
        message: "Bank Management System API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}
