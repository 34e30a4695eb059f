//! 解析错误类型

use axum::http::StatusCode;

/// 单次解析操作的错误，都只影响当前调用
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidShareUrl(String),

    /// 网络错误、超时或上游 HTTP 状态异常
    #[error("上游服务不可用: {0}")]
    UpstreamUnavailable(String),

    /// 上游返回 errno != 0
    #[error("{message} (errno={errno})")]
    UpstreamRejected { errno: i64, message: String },

    #[error("{0}")]
    EmptyResult(String),

    #[error("{0}")]
    LinkUnavailable(String),
}

impl ResolveError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidShareUrl(_) => "invalid_share_url",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::UpstreamRejected { .. } => "upstream_rejected",
            Self::EmptyResult(_) => "empty_result",
            Self::LinkUnavailable(_) => "link_unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::InvalidShareUrl(_) => StatusCode::BAD_REQUEST,
            Self::EmptyResult(_) | Self::LinkUnavailable(_) => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable(_) | Self::UpstreamRejected { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::UpstreamUnavailable(format!("请求超时: {}", e))
        } else {
            Self::UpstreamUnavailable(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
