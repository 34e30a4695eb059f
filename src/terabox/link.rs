//! 获取单个文件的下载直链

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::de::{id_string, lenient_u64};
use super::preview;
use super::session::ShareSession;
use super::tree::format_size;
use crate::error::{ResolveError, Result};
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub file_id: String,
    pub filename: String,
    pub url: String,
    pub size_bytes: u64,
    pub size_formatted: String,
    pub md5: String,
    /// 本地固定策略计算的过期时间
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct LinkResponse {
    #[serde(default)]
    errno: i64,
    #[serde(default)]
    errmsg: Option<String>,
    #[serde(default)]
    list: Vec<LinkItem>,
}

#[derive(Debug, Deserialize)]
struct LinkItem {
    #[serde(default)]
    server_filename: String,
    #[serde(default)]
    dlink: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    size: u64,
    #[serde(default, deserialize_with = "id_string")]
    md5: String,
}

impl LinkItem {
    /// 优先 dlink，没有再用 url
    fn download_url(&self) -> Option<&str> {
        self.dlink
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.url.as_deref().filter(|u| !u.is_empty()))
    }
}

/// 用文件 ID 换取一个临时下载直链
pub async fn resolve_link(
    state: &AppState,
    share_id: &str,
    file_id: &str,
    session: &ShareSession,
) -> Result<DownloadLink> {
    let timestamp = Utc::now().timestamp_millis();
    let url = format!(
        "{}/api/get-download-link?surl={}&fsids={}&logid={}&sign={}&timestamp={}",
        state.config.base_url(),
        urlencoding::encode(share_id),
        urlencoding::encode(&format!("[{}]", file_id)),
        urlencoding::encode(&session.correlation_id),
        urlencoding::encode(&session.token),
        timestamp,
    );

    debug!("📡 get-download-link: fs_id={}", file_id);

    let resp = state
        .client
        .get(&url)
        .header("User-Agent", &session.user_agent)
        .header("Accept", "application/json, text/plain, */*")
        .header("Accept-Language", "en-US,en;q=0.5")
        .header("Referer", session.referer(state.config.base_url()))
        .header("X-Requested-With", "XMLHttpRequest")
        .header("Cookie", session.cookie_header())
        .send()
        .await?
        .error_for_status()?;

    let text = resp.text().await?;
    debug!("📨 get-download-link 响应: {}", preview(&text));

    let result: LinkResponse = serde_json::from_str(&text)
        .map_err(|e| ResolveError::UpstreamUnavailable(format!("解析直链响应失败: {}", e)))?;

    if result.errno != 0 {
        let message = result
            .errmsg
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "获取下载链接失败".to_string());
        return Err(ResolveError::LinkUnavailable(format!(
            "{} (errno={})",
            message, result.errno
        )));
    }

    let item = result
        .list
        .first()
        .ok_or_else(|| ResolveError::LinkUnavailable("未返回下载链接".to_string()))?;

    let download_url = item
        .download_url()
        .ok_or_else(|| ResolveError::LinkUnavailable("dlink 为空".to_string()))?
        .to_string();

    let ttl = Duration::seconds(state.config.terabox.link_ttl_secs as i64);

    info!("✅ {}", item.server_filename);

    Ok(DownloadLink {
        file_id: file_id.to_string(),
        filename: item.server_filename.clone(),
        url: download_url,
        size_bytes: item.size,
        size_formatted: format_size(item.size),
        md5: item.md5.clone(),
        expires_at: Utc::now() + ttl,
    })
}
