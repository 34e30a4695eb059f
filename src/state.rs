//! 应用状态（配置 + HTTP client + 身份选择策略）

use anyhow::Result;
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::terabox::identity::{IdentityProvider, RandomIdentity};

/// 只保存跨请求不变的东西，会话等数据都在单次调用内创建和丢弃
pub struct AppState {
    pub config: Config,
    pub client: Client,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let identity = Arc::new(RandomIdentity::new(config.terabox.user_agents.clone()));
        Self::with_identity(config, identity)
    }

    /// 注入固定的身份策略（测试用）
    pub fn with_identity(config: Config, identity: Arc<dyn IdentityProvider>) -> Result<Self> {
        // Cookie 由会话自行保存并转发，这里不启用 cookie store
        let client = Client::builder()
            .timeout(Duration::from_secs(config.terabox.http_timeout_secs))
            .redirect(Policy::limited(config.terabox.max_redirects))
            .build()?;

        Ok(Self {
            config,
            client,
            identity,
        })
    }
}
