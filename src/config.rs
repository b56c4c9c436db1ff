//! 설정
//!
//! 명령행 인자를 우선하고, 없으면 환경 변수, 그다음 기본값을 쓴다.
// region:    --- Imports
use crate::error::ConfigError;
use crate::replica::LockReleasePolicy;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

// endregion: --- Imports

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_BASE_PORT: u16 = 7000;
pub const DEFAULT_REPLICAS: u16 = 5;
pub const DEFAULT_LOCK_DELAY_MS: u64 = 5;
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 1_000;
pub const DEFAULT_MIN_DELAY_MS: u64 = 5;
pub const DEFAULT_MAX_DELAY_MS: u64 = 30;

// region:    --- Replica Config
/// 레플리카 서버 설정
#[derive(Parser, Debug, Clone)]
#[command(name = "auction-replica", about = "Runs one auction replica")]
pub struct ReplicaConfig {
    /// 바인딩할 호스트
    #[arg(long, env = "AUCTION_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// 이 포트부터 비어 있는 포트를 찾는다
    #[arg(long, env = "AUCTION_BASE_PORT", default_value_t = DEFAULT_BASE_PORT)]
    pub base_port: u16,

    /// 변경 후 잠금 해제 지연 (ms), 0 이면 즉시 해제
    #[arg(long, env = "AUCTION_LOCK_DELAY_MS", default_value_t = DEFAULT_LOCK_DELAY_MS)]
    pub lock_delay_ms: u64,

    /// 로그 파일 경로 (기본: replica-<port>.txt)
    #[arg(long, env = "AUCTION_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// 로그 파일 없이 표준 출력만 사용
    #[arg(long)]
    pub no_log_file: bool,
}

impl ReplicaConfig {
    pub fn lock_policy(&self) -> LockReleasePolicy {
        LockReleasePolicy::from_millis(self.lock_delay_ms)
    }

    /// 실제로 바인딩된 포트 기준의 로그 파일 경로
    pub fn log_path(&self, port: u16) -> Option<PathBuf> {
        if self.no_log_file {
            return None;
        }
        Some(
            self.log_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("replica-{port}.txt"))),
        )
    }
}
// endregion: --- Replica Config

// region:    --- Client Config
/// 클라이언트 설정
#[derive(Parser, Debug, Clone)]
#[command(name = "auction-client", about = "Broadcasts auction commands to all replicas")]
pub struct ClientConfig {
    /// 입찰자 id (0 보다 큰 u32)
    pub id: u32,

    /// 레플리카 호스트
    #[arg(long, env = "AUCTION_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// 첫 번째 레플리카 포트
    #[arg(long, env = "AUCTION_BASE_PORT", default_value_t = DEFAULT_BASE_PORT)]
    pub base_port: u16,

    /// 레플리카 수
    #[arg(long, env = "AUCTION_REPLICAS", default_value_t = DEFAULT_REPLICAS)]
    pub replicas: u16,

    /// 레플리카 호출 하나당 타임아웃 (ms)
    #[arg(long, env = "AUCTION_CALL_TIMEOUT_MS", default_value_t = DEFAULT_CALL_TIMEOUT_MS)]
    pub call_timeout_ms: u64,

    /// 무작위 명령을 자동으로 보낸다
    #[arg(long)]
    pub auto: bool,

    /// 자동 모드 명령 사이 최소 대기 (ms)
    #[arg(long, default_value_t = DEFAULT_MIN_DELAY_MS)]
    pub min_delay_ms: u64,

    /// 자동 모드 명령 사이 최대 대기 (ms, 미포함)
    #[arg(long, default_value_t = DEFAULT_MAX_DELAY_MS)]
    pub max_delay_ms: u64,

    /// 로그 파일 경로 (기본: client-<id>.txt)
    #[arg(long, env = "AUCTION_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(long)]
    pub no_log_file: bool,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id == 0 {
            return Err(ConfigError::ZeroClientId);
        }
        if self.replicas == 0 {
            return Err(ConfigError::NoReplicas);
        }
        if self.call_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.min_delay_ms >= self.max_delay_ms {
            return Err(ConfigError::DelayRange {
                min: self.min_delay_ms,
                max: self.max_delay_ms,
            });
        }
        Ok(())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        if self.no_log_file {
            return None;
        }
        Some(
            self.log_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("client-{}.txt", self.id))),
        )
    }
}
// endregion: --- Client Config
