//! Web 服务器模块
//!
//! 只负责把 HTTP 请求转给三个解析操作，并把结果包装成统一的 JSON 信封

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::ResolveError;
use crate::terabox::{self, AggregateInfo, AggregateReport, DownloadLink};
use crate::AppState;

/// 共享状态 + 启动时间（用于 uptime）
#[derive(Clone)]
pub struct WebState {
    pub app: Arc<AppState>,
    pub started_at: Instant,
}

#[derive(Debug, Deserialize)]
pub struct InfoRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub password: String,
}

/// 统一响应信封
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: u64,
    pub version: &'static str,
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("❌ [{}] {}", self.code(), self);
        } else {
            warn!("⚠️ [{}] {}", self.code(), self);
        }
        (status, Json(ApiResponse::fail(self.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ResolveError>;

/// 请求体不是合法 JSON 时也返回统一信封
impl From<JsonRejection> for ResolveError {
    fn from(rejection: JsonRejection) -> Self {
        ResolveError::InvalidInput(rejection.body_text())
    }
}

/// 服务说明
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "TeraBox Direct Link API",
        "version": crate::VERSION,
        "endpoints": {
            "health": "/api/health",
            "getInfo": "/api/terabox/info",
            "download": "/api/terabox/download",
            "downloadFolder": "/api/terabox/folder"
        }
    }))
}

/// 健康检查
pub async fn health_handler(State(state): State<WebState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs(),
        version: crate::VERSION,
    })
}

/// 分享信息
pub async fn info_handler(
    State(state): State<WebState>,
    payload: Result<Json<InfoRequest>, JsonRejection>,
) -> ApiResult<AggregateInfo> {
    let Json(req) = payload?;
    info!("📥 收到 info 请求: {}", req.url);
    let info = terabox::resolve_info(&state.app, &req.url, &req.password).await?;
    Ok(Json(ApiResponse::ok(info)))
}

/// 单文件直链
pub async fn download_handler(
    State(state): State<WebState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> ApiResult<DownloadLink> {
    let Json(req) = payload?;
    info!("📥 收到 download 请求: {} fs_id={}", req.url, req.file_id);
    let link =
        terabox::resolve_download(&state.app, &req.url, &req.file_id, &req.password).await?;
    Ok(Json(ApiResponse::ok(link)))
}

/// 整个文件夹的直链
pub async fn folder_handler(
    State(state): State<WebState>,
    payload: Result<Json<InfoRequest>, JsonRejection>,
) -> ApiResult<AggregateReport> {
    let Json(req) = payload?;
    info!("📥 收到 folder 请求: {}", req.url);
    let report = terabox::resolve_folder(&state.app, &req.url, &req.password).await?;
    Ok(Json(ApiResponse::ok(report)))
}

async fn not_found_handler() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::fail("Endpoint not found")),
    )
}

/// 创建 Web 路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let state = WebState {
        app: state,
        started_at: Instant::now(),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/terabox/info", post(info_handler))
        .route("/api/terabox/download", post(download_handler))
        .route("/api/terabox/folder", post(folder_handler))
        .fallback(not_found_handler)
        .with_state(state)
}
