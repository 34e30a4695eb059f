//! TeraBox 分享解析模块

pub mod aggregate;
pub mod de;
pub mod identity;
pub mod link;
pub mod listing;
pub mod parser;
pub mod resolve;
pub mod session;
pub mod tree;

// 导出常用函数
pub use aggregate::aggregate_links;
pub use identity::{FixedIdentity, IdentityProvider, RandomIdentity};
pub use link::{resolve_link, DownloadLink};
pub use listing::{fetch_listing, RawItem, RawListing};
pub use parser::extract_share_id;
pub use resolve::{resolve_download, resolve_folder, resolve_info, AggregateInfo, AggregateReport};
pub use session::{acquire_session, ShareSession};
pub use tree::{flatten_file_ids, format_size, normalize, FileEntry, FileNode, FolderEntry};

/// 日志里只显示响应开头部分
pub(crate) fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 300;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}
