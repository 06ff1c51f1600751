use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::common::error::ImportError;
use crate::config::Config;
use crate::importer::ImportUseCase;
use crate::storage::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/events/range", get(events_in_range))
        .route("/api/theatres", get(list_theatres))
        .route("/api/admin/verify", post(verify_admin))
        .route("/api/admin/upload", post(upload_workbook))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %bind, "server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn list_events(State(state): State<AppState>) -> Response {
    match state.store.events().await {
        Ok(events) => Json(events).into_response(),
        Err(e) => store_failure(e),
    }
}

#[derive(Debug, Deserialize)]
struct RangeParams {
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
}

async fn events_in_range(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Response {
    let result = state
        .store
        .events_in_range(params.start_date.as_deref(), params.end_date.as_deref())
        .await;
    match result {
        Ok(events) => Json(events).into_response(),
        Err(e) => store_failure(e),
    }
}

async fn list_theatres(State(state): State<AppState>) -> Response {
    match state.store.theatres().await {
        Ok(theatres) => Json(theatres).into_response(),
        Err(e) => store_failure(e),
    }
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    password: String,
}

async fn verify_admin(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Response {
    if request.password == state.config.server.admin_password {
        Json(json!({ "success": true, "message": "Password verified" })).into_response()
    } else {
        warn!("admin verification failed");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid password" })),
        )
            .into_response()
    }
}

/// Accepted upload extensions; calamine handles all three containers.
const SPREADSHEET_EXTENSIONS: [&str; 3] = [".xlsx", ".xls", ".ods"];

async fn upload_workbook(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut file: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((filename, bytes.to_vec())),
                    Err(e) => return bad_request(format!("Error reading upload: {e}")),
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => return bad_request(format!("Invalid multipart request: {e}")),
        }
    }

    let Some((filename, bytes)) = file else {
        return bad_request("No file uploaded".to_string());
    };
    let lower = filename.to_lowercase();
    if !SPREADSHEET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return bad_request("Only spreadsheet files are allowed!".to_string());
    }

    info!(file = %filename, bytes = bytes.len(), "processing uploaded workbook");
    let use_case = ImportUseCase::new(state.config.import, state.store.clone());
    match use_case.import_bytes(&bytes).await {
        Ok(summary) => {
            let mut body = serde_json::to_value(&summary).unwrap_or_default();
            if let Some(map) = body.as_object_mut() {
                map.insert("success".into(), json!(true));
                map.insert("message".into(), json!(summary.message()));
            }
            Json(body).into_response()
        }
        Err(e) if e.is_user_error() => bad_request(e.to_string()),
        Err(e) => {
            error!(error = %e, "import failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Error saving data" })),
            )
                .into_response()
        }
    }
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

fn store_failure(e: ImportError) -> Response {
    error!(error = %e, "store read failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "Error reading data" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            config: Arc::new(Config::default()),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn events_endpoint_returns_empty_list_for_fresh_store() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response.into_response()).await, json!([]));
    }

    #[tokio::test]
    async fn verify_accepts_the_configured_password() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/verify")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"password":"Test123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_response()).await;
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn verify_rejects_a_wrong_password_with_401() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/verify")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"password":"nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response.into_response()).await;
        assert_eq!(body["success"], false);
    }
}
