//! TeraBox 分享链接解析与直链获取

pub mod config;
pub mod error;
pub mod state;
pub mod terabox;
pub mod web;

pub use config::Config;
pub use error::ResolveError;
pub use state::AppState;
pub use terabox::{resolve_download, resolve_folder, resolve_info};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
