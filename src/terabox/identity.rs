//! 客户端身份（User-Agent）选择

use rand::Rng;

const FALLBACK_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 每次获取会话时调用一次，选出的身份在整个操作内保持不变
pub trait IdentityProvider: Send + Sync {
    fn user_agent(&self) -> String;
}

/// 从固定池中随机选取
pub struct RandomIdentity {
    pool: Vec<String>,
}

impl RandomIdentity {
    pub fn new(pool: Vec<String>) -> Self {
        let pool = pool
            .into_iter()
            .filter(|ua| !ua.trim().is_empty())
            .collect();
        Self { pool }
    }
}

impl IdentityProvider for RandomIdentity {
    fn user_agent(&self) -> String {
        if self.pool.is_empty() {
            return FALLBACK_UA.to_string();
        }
        let idx = rand::rng().random_range(0..self.pool.len());
        self.pool[idx].clone()
    }
}

/// 始终返回同一个身份
pub struct FixedIdentity(pub String);

impl IdentityProvider for FixedIdentity {
    fn user_agent(&self) -> String {
        self.0.clone()
    }
}
