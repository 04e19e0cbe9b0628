//! 설정 로드: 설정 파일 위에 WIDGETSYNC_* 환경변수를 덮어쓴다.
//!
//! 예: `WIDGETSYNC_SERVER__BASE_URL=https://api.example.com`

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use widgetsync_core::config::AppConfig;
use widgetsync_core::config_manager::ConfigManager;

/// 환경변수 접두사
const ENV_PREFIX: &str = "WIDGETSYNC";

/// 중첩 키 구분자 (`SERVER__BASE_URL` → `server.base_url`)
const ENV_SEPARATOR: &str = "__";

/// 설정 파일 경로 결정 (인자 우선, 없으면 플랫폼 기본 경로)
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => ConfigManager::default_config_path().context("기본 설정 경로 결정 실패"),
    }
}

/// 설정 파일(없으면 기본값으로 생성) + 프로세스 환경변수
pub fn load_config(path: &Path) -> Result<AppConfig> {
    load_config_with_env(path, None)
}

/// `env`가 주어지면 프로세스 환경 대신 그 맵을 환경변수로 사용
pub fn load_config_with_env(path: &Path, env: Option<HashMap<String, String>>) -> Result<AppConfig> {
    let manager = ConfigManager::with_path(path.to_path_buf())
        .with_context(|| format!("설정 파일 준비 실패: {}", path.display()))?;

    let layered = Config::builder()
        .add_source(File::from(manager.config_path()).format(FileFormat::Json))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .source(env),
        )
        .build()
        .context("설정 병합 실패")?;

    let config: AppConfig = layered
        .try_deserialize()
        .context("설정 역직렬화 실패")?;
    config.validate().context("설정 검증 실패")?;
    Ok(config)
}
