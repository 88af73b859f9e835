use poem_openapi::payload::Json;

use crate::rest_api::api::{HealthResponse, HealthStatus};

pub async fn v1_health() -> HealthResponse {
    HealthResponse::Ok(Json(HealthStatus {
        status: "OK".to_string(),
    }))
}
