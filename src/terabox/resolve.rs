//! 对外的三个解析操作
//!
//! 每次调用都独立完成：解析分享 ID → 获取会话 → 获取列表 → 规范化文件树，
//! 之后按需获取单个直链或整个文件夹的直链。会话在调用结束时丢弃。

use serde::Serialize;
use tracing::info;

use super::aggregate::aggregate_links;
use super::link::{resolve_link, DownloadLink};
use super::listing::{fetch_listing, RawListing};
use super::parser::extract_share_id;
use super::session::{acquire_session, ShareSession};
use super::tree::{format_size, leaf_files, normalize, total_size, FileNode};
use crate::error::{ResolveError, Result};
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateInfo {
    pub share_id: String,
    pub title: String,
    pub owner_name: String,
    pub owner_avatar_url: String,
    /// 所有层级的文件数（不含文件夹）
    pub total_file_count: usize,
    /// 所有层级文件大小之和
    pub total_size_bytes: u64,
    pub total_size_formatted: String,
    pub tree: Vec<FileNode>,
    pub has_password: bool,
    pub expire_time: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    #[serde(flatten)]
    pub info: AggregateInfo,
    /// 只包含成功获取的直链
    pub links: Vec<DownloadLink>,
}

/// 获取分享信息和文件树
pub async fn resolve_info(state: &AppState, url: &str, pwd: &str) -> Result<AggregateInfo> {
    let share_id = require_share_id(url)?;
    let (session, listing) = load_share(state, &share_id, pwd).await?;

    if listing.list.is_empty() {
        session.discard();
        return Err(ResolveError::EmptyResult("未找到任何文件".to_string()));
    }

    let info = build_info(&share_id, listing);
    session.discard();
    Ok(info)
}

/// 获取单个文件的直链
pub async fn resolve_download(
    state: &AppState,
    url: &str,
    file_id: &str,
    pwd: &str,
) -> Result<DownloadLink> {
    if url.trim().is_empty() || file_id.trim().is_empty() {
        return Err(ResolveError::InvalidInput(
            "分享链接和文件 ID 不能为空".to_string(),
        ));
    }
    let share_id = require_share_id(url)?;
    let (session, _listing) = load_share(state, &share_id, pwd).await?;

    let result = resolve_link(state, &share_id, file_id.trim(), &session).await;
    session.discard();
    result
}

/// 获取整个分享（含子文件夹）所有文件的直链
pub async fn resolve_folder(state: &AppState, url: &str, pwd: &str) -> Result<AggregateReport> {
    let share_id = require_share_id(url)?;
    let (session, listing) = load_share(state, &share_id, pwd).await?;

    if listing.list.is_empty() {
        session.discard();
        return Err(ResolveError::EmptyResult("未找到任何文件".to_string()));
    }

    let info = build_info(&share_id, listing);
    if info.total_file_count == 0 {
        session.discard();
        return Err(ResolveError::EmptyResult(
            "文件夹中没有可下载的文件".to_string(),
        ));
    }

    let links = aggregate_links(state, &info.tree, &share_id, &session).await;
    session.discard();

    Ok(AggregateReport { info, links })
}

/// 校验输入并提取分享 ID，失败时不发起任何网络请求
fn require_share_id(url: &str) -> Result<String> {
    if url.trim().is_empty() {
        return Err(ResolveError::InvalidInput("分享链接不能为空".to_string()));
    }
    extract_share_id(url)
        .ok_or_else(|| ResolveError::InvalidShareUrl(format!("无效的 TeraBox 分享链接: {}", url)))
}

async fn load_share(
    state: &AppState,
    share_id: &str,
    pwd: &str,
) -> Result<(ShareSession, RawListing)> {
    info!("📥 解析分享: share_id={}", share_id);
    let session = acquire_session(state, share_id).await?;
    let listing = fetch_listing(state, share_id, pwd, &session).await?;
    Ok((session, listing))
}

fn build_info(share_id: &str, listing: RawListing) -> AggregateInfo {
    let has_password = listing.has_password();
    let tree = normalize(&listing.list, "");
    let total_file_count = leaf_files(&tree).len();
    let total_size_bytes = total_size(&tree);

    let owner = listing.ukinfo.unwrap_or_default();

    AggregateInfo {
        share_id: share_id.to_string(),
        title: listing
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        owner_name: owner
            .uname
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
        owner_avatar_url: owner.avatar_url.unwrap_or_default(),
        total_file_count,
        total_size_bytes,
        total_size_formatted: format_size(total_size_bytes),
        tree,
        has_password,
        expire_time: listing.expire_time,
    }
}
