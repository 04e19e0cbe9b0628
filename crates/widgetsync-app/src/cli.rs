//! 명령줄 인자 정의.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use widgetsync_core::models::resource::{RequestMethod, ResourceKind};

/// 원격 위젯/챗봇 설정 동기화 도구
#[derive(Parser, Debug)]
#[command(name = "widgetsync")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error). RUST_LOG가 우선
    #[arg(long, short = 'l', global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 해석된 탭 목록 출력 (네트워크 호출 없음)
    Tabs { kind: ResourceKind },

    /// 문서 조회
    Fetch { kind: ResourceKind },

    /// JSON 파일의 문서를 저장하고 정본 출력
    Save {
        kind: ResourceKind,
        file: PathBuf,
        /// 저장 대상 탭
        #[arg(long)]
        tab: Option<String>,
        /// HTTP 메서드
        #[arg(long, default_value = "POST")]
        method: RequestMethod,
    },

    /// JSON 파일의 settings 객체만 설정 전용 엔드포인트로 저장
    SaveSettings { kind: ResourceKind, file: PathBuf },

    /// 탭 기준 초기화 후 정본 출력
    Reset {
        kind: ResourceKind,
        #[arg(long)]
        tab: Option<String>,
    },

    /// 문서를 조회한 뒤 푸시 갱신을 계속 출력 (Ctrl+C로 종료)
    Watch { kind: ResourceKind },
}

impl Command {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Command::Tabs { kind }
            | Command::Fetch { kind }
            | Command::Save { kind, .. }
            | Command::SaveSettings { kind, .. }
            | Command::Reset { kind, .. }
            | Command::Watch { kind } => *kind,
        }
    }
}
