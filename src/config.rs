//! 配置文件加载

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub terabox: TeraboxConfig,
    #[serde(default)] // 没有 [resolver] 就用默认值
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeraboxConfig {
    /// 上游站点根地址，测试时指向 mock 服务器
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// 直链有效期（秒），本地固定策略，不读取上游返回
    #[serde(default = "default_link_ttl_secs")]
    pub link_ttl_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// 浏览器标识池，每次获取会话时随机选取一个
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

/// 文件夹批量解析
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// 每一批并发请求的直链数量，1 表示严格串行
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// 连续失败达到该次数后停止剩余请求，0 表示关闭熔断
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for TeraboxConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            link_ttl_secs: default_link_ttl_secs(),
            max_redirects: default_max_redirects(),
            user_agents: default_user_agents(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            failure_threshold: default_failure_threshold(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_base_url() -> String {
    // 优先使用环境变量
    std::env::var("TERABOX_BASE_URL").unwrap_or_else(|_| "https://teraboxapp.com".to_string())
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_link_ttl_secs() -> u64 {
    4 * 60 * 60
}

fn default_max_redirects() -> usize {
    5
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_concurrency() -> usize {
    4
}

fn default_failure_threshold() -> usize {
    5
}

fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000)
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 配置文件不存在时使用默认值（含环境变量覆盖）
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 启动前校验配置
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.terabox.base_url)
            .map_err(|e| anyhow!("base_url 无效: {} ({})", self.terabox.base_url, e))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(anyhow!("base_url 必须是 http(s) 地址: {}", self.terabox.base_url));
        }
        if self.terabox.http_timeout_secs == 0 {
            return Err(anyhow!("http_timeout_secs 必须大于 0"));
        }
        if self.terabox.link_ttl_secs == 0 {
            return Err(anyhow!("link_ttl_secs 必须大于 0"));
        }
        if self.terabox.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(anyhow!("user_agents 不能为空"));
        }
        if self.resolver.concurrency == 0 {
            return Err(anyhow!("resolver.concurrency 必须至少为 1"));
        }
        Ok(())
    }

    /// 去掉结尾斜杠的上游根地址
    pub fn base_url(&self) -> &str {
        self.terabox.base_url.trim_end_matches('/')
    }
}
