//! 文件夹批量获取直链
//!
//! 先深度优先展开出所有文件 ID，再按批次并发获取直链。单个文件失败只记录日志，
//! 不影响整体结果；连续失败过多时认为会话已失效，跳过剩余文件。

use futures_util::future::join_all;
use tracing::{info, warn};

use super::link::{resolve_link, DownloadLink};
use super::session::ShareSession;
use super::tree::{flatten_file_ids, FileNode};
use crate::AppState;

/// 为树中所有文件获取直链，返回顺序与深度优先的文件顺序一致
pub async fn aggregate_links(
    state: &AppState,
    tree: &[FileNode],
    share_id: &str,
    session: &ShareSession,
) -> Vec<DownloadLink> {
    let ids = flatten_file_ids(tree);
    let concurrency = state.config.resolver.concurrency.max(1);
    let threshold = state.config.resolver.failure_threshold;

    info!(
        "🔗 获取 {} 个文件的下载直链（并发 {}）...",
        ids.len(),
        concurrency
    );

    let mut links = Vec::with_capacity(ids.len());
    let mut consecutive_failures = 0usize;
    let mut processed = 0usize;

    for wave in ids.chunks(concurrency) {
        let results = join_all(
            wave.iter()
                .map(|id| resolve_link(state, share_id, id, session)),
        )
        .await;

        for (id, result) in wave.iter().zip(results) {
            processed += 1;
            match result {
                Ok(link) => {
                    consecutive_failures = 0;
                    links.push(link);
                }
                Err(e) => {
                    consecutive_failures += 1;
                    warn!("⚠️ [{}/{}] 获取 fs_id={} 的直链失败: {}", processed, ids.len(), id, e);
                }
            }
        }

        if threshold > 0 && consecutive_failures >= threshold && processed < ids.len() {
            warn!(
                "🛑 连续 {} 次失败，会话可能已失效，跳过剩余 {} 个文件",
                consecutive_failures,
                ids.len() - processed
            );
            break;
        }
    }

    info!("✅ 成功获取 {}/{} 个下载链接", links.len(), ids.len());
    links
}
