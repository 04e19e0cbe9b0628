//! # widgetsync-app
//!
//! widgetsync 바이너리 진입점.
//! 설정 로드, 로깅 초기화, 어댑터 조립 후 하위 명령을 실행한다.

mod cli;
mod commands;
mod config_loader;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use widgetsync_core::config::AppConfig;

use crate::cli::Args;

/// 로그 필터 문자열 (우리 크레이트에만 레벨 적용)
fn log_filter(level: &str) -> String {
    [
        "widgetsync",
        "widgetsync_core",
        "widgetsync_network",
        "widgetsync_settings",
    ]
    .iter()
    .map(|target| format!("{target}={level}"))
    .collect::<Vec<_>>()
    .join(",")
}

/// 인자 > 설정 파일 순 (RUST_LOG는 필터 생성 시 우선)
fn effective_log_level(cli_level: Option<&str>, config: &AppConfig) -> String {
    cli_level
        .map(str::to_string)
        .unwrap_or_else(|| config.logging.level.clone())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config_loader::resolve_config_path(args.config.as_deref())?;
    let config = config_loader::load_config(&config_path)?;

    // stdout은 JSON 출력 전용
    let level = effective_log_level(args.log_level.as_deref(), &config);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(&level))),
        )
        .init();
    info!("설정 파일: {}", config_path.display());
    debug!(
        "설정 로드 완료: base_url={}, timeout={}ms",
        config.server.base_url, config.server.request_timeout_ms
    );

    commands::run(args.command, &config).await
}
