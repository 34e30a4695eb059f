//! 分享页会话获取
//!
//! 访问分享落地页，收集 Cookie，并从页面里提取 jsToken 和 logid

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::SET_COOKIE;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::AppState;

/// 单次操作内有效的会话，不缓存、不跨操作复用
#[derive(Debug)]
pub struct ShareSession {
    pub share_id: String,
    /// 页面中的 jsToken，可能为空
    pub token: String,
    /// logid，页面里没有时为 base64(share_id)
    pub correlation_id: String,
    /// Set-Cookie 原文，保持返回顺序
    pub cookies: Vec<String>,
    /// 获取会话时选定的身份，后续请求沿用
    pub user_agent: String,
    pub acquired_at: DateTime<Utc>,
}

impl ShareSession {
    /// 转发用的 Cookie 请求头，只取每条 Set-Cookie 的 name=value 部分
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .filter_map(|c| c.split(';').next())
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn referer(&self, base_url: &str) -> String {
        format!("{}/s/{}", base_url, self.share_id)
    }

    /// 操作结束时丢弃会话
    pub fn discard(self) {
        debug!(
            "🗑️ 丢弃会话: share_id={}, 存活 {}ms",
            self.share_id,
            (Utc::now() - self.acquired_at).num_milliseconds()
        );
    }
}

/// 获取分享会话
pub async fn acquire_session(state: &AppState, share_id: &str) -> Result<ShareSession> {
    let user_agent = state.identity.user_agent();
    let landing_url = format!("{}/s/{}", state.config.base_url(), share_id);

    info!("🌐 访问分享页面: {}", landing_url);

    let resp = state
        .client
        .get(&landing_url)
        .header("User-Agent", &user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.5")
        .header("Upgrade-Insecure-Requests", "1")
        .send()
        .await?
        .error_for_status()?;

    let cookies: Vec<String> = resp
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect();

    let html = resp.text().await?;
    debug!("📄 页面长度: {} 字节, Cookie {} 条", html.len(), cookies.len());

    let token = extract_js_token(&html).unwrap_or_default();
    let correlation_id = extract_logid(&html).unwrap_or_else(|| fallback_logid(share_id));
    debug!(
        "🔑 jsToken 长度: {}, logid: {}",
        token.len(),
        correlation_id
    );

    Ok(ShareSession {
        share_id: share_id.to_string(),
        token,
        correlation_id,
        cookies,
        user_agent,
        acquired_at: Utc::now(),
    })
}

/// 从 HTML 中提取 jsToken
pub fn extract_js_token(html: &str) -> Option<String> {
    static JS_TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    let re = JS_TOKEN_RE
        .get_or_init(|| Regex::new(r#"jsToken\s*[:=]\s*['"]([^'"]+)['"]"#).unwrap());
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// 从 HTML 中提取 logid
pub fn extract_logid(html: &str) -> Option<String> {
    static LOGID_RE: OnceLock<Regex> = OnceLock::new();
    let re = LOGID_RE.get_or_init(|| Regex::new(r#"logid\s*[:=]\s*['"]([^'"]+)['"]"#).unwrap());
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// 页面没有 logid 时的确定性替代值
pub fn fallback_logid(share_id: &str) -> String {
    STANDARD.encode(share_id.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_cookies(cookies: &[&str]) -> ShareSession {
        ShareSession {
            share_id: "1abc".to_string(),
            token: String::new(),
            correlation_id: fallback_logid("1abc"),
            cookies: cookies.iter().map(|s| s.to_string()).collect(),
            user_agent: "ua".to_string(),
            acquired_at: Utc::now(),
        }
    }

    #[test]
    fn test_extract_tokens() {
        let html = r#"<script>var jsToken = "ABCDEF123"; window.conf = { logid: 'LOG-42' };</script>"#;
        assert_eq!(extract_js_token(html).as_deref(), Some("ABCDEF123"));
        assert_eq!(extract_logid(html).as_deref(), Some("LOG-42"));
    }

    #[test]
    fn test_missing_tokens() {
        let html = "<html><body>nothing here</body></html>";
        assert!(extract_js_token(html).is_none());
        assert!(extract_logid(html).is_none());
    }

    #[test]
    fn test_fallback_logid_is_stable() {
        assert_eq!(fallback_logid("abc"), "YWJj");
        assert_eq!(fallback_logid("1xyz"), fallback_logid("1xyz"));
    }

    #[test]
    fn test_cookie_header_keeps_order() {
        let session = session_with_cookies(&[
            "ndus=AAA; Path=/; HttpOnly",
            "csrfToken=BBB; Path=/",
            "browserid=CCC",
        ]);
        assert_eq!(session.cookie_header(), "ndus=AAA; csrfToken=BBB; browserid=CCC");
    }

    #[test]
    fn test_cookie_header_empty() {
        let session = session_with_cookies(&[]);
        assert_eq!(session.cookie_header(), "");
    }
}
