use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terabox_direct_link::{config::Config, terabox, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terabox_direct_link=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 用法：terabox-direct-link <share_url> [pwd] [file_id]
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err(anyhow!(
            "用法: {} <share_url> [pwd] [file_id]",
            args.first()
                .map(|s| s.as_str())
                .unwrap_or("terabox-direct-link")
        ));
    }

    let share_url = args[1].clone();
    let pwd = args.get(2).cloned().unwrap_or_default();
    let file_id = args.get(3).cloned();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load_or_default(&config_path)?;
    config.validate()?;
    if std::path::Path::new(&config_path).exists() {
        tracing::info!("✅ 配置加载完成: {}", config_path);
    } else {
        tracing::info!("✅ 配置从环境变量加载");
    }

    let state = Arc::new(AppState::new(config)?);

    let output = match file_id {
        Some(file_id) => {
            let link = terabox::resolve_download(&state, &share_url, &file_id, &pwd).await?;
            serde_json::to_string_pretty(&link)?
        }
        None => {
            let report = terabox::resolve_folder(&state, &share_url, &pwd).await?;
            tracing::info!(
                "📦 共 {} 个文件，成功获取 {} 个直链",
                report.info.total_file_count,
                report.links.len()
            );
            serde_json::to_string_pretty(&report)?
        }
    };

    println!("{}", output);
    Ok(())
}
