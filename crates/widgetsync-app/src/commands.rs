//! 하위 명령 실행. 어댑터를 조립한 뒤 동기화기를 호출한다.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use widgetsync_core::config::AppConfig;
use widgetsync_core::models::document::ConfigurationDocument;
use widgetsync_core::models::resource::ResourceKind;
use widgetsync_network::auth::TokenManager;
use widgetsync_network::http_client::HttpResourceClient;
use widgetsync_network::ws_client::WsPushFeed;
use widgetsync_settings::syncer::RemoteSettingsSyncer;

use crate::cli::Command;

/// 조립된 런타임 구성요소
struct Wiring {
    tokens: Arc<TokenManager>,
    syncer: Arc<RemoteSettingsSyncer>,
}

async fn wire(config: &AppConfig, kind: ResourceKind) -> Result<Wiring> {
    let tokens = Arc::new(TokenManager::new());
    match config.server.api_token.as_deref() {
        Some(token) => tokens.set_token(token).await?,
        None => warn!("API 토큰 미설정: 서버 요청이 인증 에러로 실패합니다"),
    }

    let client = Arc::new(HttpResourceClient::new(
        &config.server.base_url,
        tokens.clone(),
        config.server.request_timeout(),
    )?);
    let syncer = Arc::new(RemoteSettingsSyncer::for_kind(kind, client));

    Ok(Wiring { tokens, syncer })
}

/// 명령 실행
pub async fn run(command: Command, config: &AppConfig) -> Result<()> {
    let kind = command.kind();
    let Wiring { tokens, syncer } = wire(config, kind).await?;

    match command {
        Command::Tabs { .. } => print_json(&syncer.get_tabs())?,
        Command::Fetch { .. } => print_json(&*syncer.fetch_data().await?)?,
        Command::Save {
            file, tab, method, ..
        } => {
            let document: ConfigurationDocument = read_json(&file)?;
            let saved = syncer.save_data(&document, tab.as_deref(), method).await?;
            print_json(&*saved)?;
        }
        Command::SaveSettings { file, .. } => {
            let settings: Map<String, Value> = read_json(&file)?;
            syncer.save_settings_only(&settings).await?;
            print_json(&settings)?;
        }
        Command::Reset { tab, .. } => {
            let document = syncer.reset_data(tab.as_deref()).await?;
            print_json(&*document)?;
        }
        Command::Watch { .. } => watch(config, syncer, tokens).await?,
    }
    Ok(())
}

/// 초기 문서 출력 후 푸시로 갱신될 때마다 다시 출력
async fn watch(
    config: &AppConfig,
    syncer: Arc<RemoteSettingsSyncer>,
    tokens: Arc<TokenManager>,
) -> Result<()> {
    let mut updates = syncer.subscribe();
    print_json(&*syncer.fetch_data().await?)?;

    let feed = Arc::new(WsPushFeed::new(
        &config.server.push_base_url(),
        tokens,
        config.server.push_max_retry_secs,
    ));
    let handle = syncer.attach_push_feed(feed);
    info!("푸시 감시 시작: kind={}", syncer.kind());

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(document) => print_json(&*document)?,
                Err(RecvError::Lagged(skipped)) => warn!("갱신 {skipped}건 건너뜀"),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("종료 신호 수신");
                break;
            }
        }
    }

    handle.abort();
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("파일 읽기 실패: {}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| anyhow!("JSON 파싱 실패: {}: {e}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
