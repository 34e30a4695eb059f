//! 分享文件列表获取

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::de::{id_string, is_truthy, lenient_u64};
use super::preview;
use super::session::{fallback_logid, ShareSession};
use crate::error::{ResolveError, Result};
use crate::AppState;

/// shorturlinfo 接口原始响应
#[derive(Debug, Clone, Deserialize)]
pub struct RawListing {
    #[serde(default)]
    pub errno: i64,
    #[serde(default)]
    pub errmsg: Option<String>,
    #[serde(default)]
    pub list: Vec<RawItem>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ukinfo: Option<RawOwner>,
    #[serde(default)]
    pub pwd: serde_json::Value,
    #[serde(default, rename = "expireTime")]
    pub expire_time: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOwner {
    #[serde(default)]
    pub uname: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub isdir: u64,
    #[serde(default)]
    pub server_filename: String,
    // 字段名可能是 fs_id 或 fsid
    #[serde(default, alias = "fsid", deserialize_with = "id_string")]
    pub fs_id: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: u64,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub thumbs: Option<RawThumbs>,
    #[serde(default)]
    pub children: Option<Vec<RawItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawThumbs {
    #[serde(default)]
    pub url3: Option<String>,
}

impl RawItem {
    pub fn is_dir(&self) -> bool {
        self.isdir == 1
    }
}

impl RawListing {
    pub fn has_password(&self) -> bool {
        is_truthy(&self.pwd)
    }
}

/// 获取分享文件列表
pub async fn fetch_listing(
    state: &AppState,
    share_id: &str,
    pwd: &str,
    session: &ShareSession,
) -> Result<RawListing> {
    let logid = if session.correlation_id.is_empty() {
        fallback_logid(share_id)
    } else {
        session.correlation_id.clone()
    };

    // uk/shareid/primaryid 事先未知，但接口要求必须带上
    let url = format!(
        "{}/api/shorturlinfo?surl={}&logid={}&pwd={}&uk=&shareid=&primaryid=",
        state.config.base_url(),
        urlencoding::encode(share_id),
        urlencoding::encode(&logid),
        urlencoding::encode(pwd),
    );

    info!("📋 获取文件列表: surl={}", share_id);

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
    debug!("📨 shorturlinfo 响应: {}", preview(&text));

    let listing: RawListing = serde_json::from_str(&text)
        .map_err(|e| ResolveError::UpstreamUnavailable(format!("解析列表响应失败: {}", e)))?;

    if listing.errno != 0 {
        warn!("⚠️ shorturlinfo errno: {}", listing.errno);
        let message = listing
            .errmsg
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "获取文件信息失败".to_string());
        return Err(ResolveError::UpstreamRejected {
            errno: listing.errno,
            message,
        });
    }

    info!("✅ 顶层共 {} 项", listing.list.len());
    Ok(listing)
}
