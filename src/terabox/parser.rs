//! 分享链接解析

use regex::Regex;
use std::sync::OnceLock;

/// 从分享链接中提取分享 ID
///
/// 按顺序尝试：
/// - https://teraboxapp.com/s/1xxxx
/// - https://terabox.com/s/1xxxx
/// - 任意域名下的 /s/1xxxx
/// - ...?surl=xxxx
pub fn extract_share_id(share_url: &str) -> Option<String> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            r"(?i)teraboxapp\.com/s/([a-zA-Z0-9_-]+)",
            r"(?i)terabox\.com/s/([a-zA-Z0-9_-]+)",
            r"(?i)/s/([a-zA-Z0-9_-]+)",
            r"(?i)surl=([a-zA-Z0-9_-]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });

    let url = share_url.trim();
    patterns
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
