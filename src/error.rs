//! 에러 타입
//!
//! 경매 도메인의 거절(FAIL/EXCEPTION)은 에러가 아니라 `Ack` 로 표현된다.
//! 여기 있는 것은 전송 계층, 서버 기동, 설정, 명령 해석 실패뿐이다.
use crate::client::ReplicaDescriptor;
use thiserror::Error;

/// 클라이언트 측 레플리카 호출 에러
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// 추적 중인 레플리카가 하나도 남지 않음
    #[error("no replica available")]
    NoReplicaAvailable,

    #[error("replica {0} timed out")]
    Timeout(ReplicaDescriptor),

    #[error("replica {replica} unreachable: {reason}")]
    Transport {
        replica: ReplicaDescriptor,
        reason: String,
    },

    #[error("bidder id 0 is reserved for 'no bidder'")]
    InvalidBidderId,
}

impl ClientError {
    pub fn transport(replica: &ReplicaDescriptor, reason: impl ToString) -> Self {
        ClientError::Transport {
            replica: replica.clone(),
            reason: reason.to_string(),
        }
    }
}

/// 레플리카 서버 기동 에러
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("no free port at or above {0}")]
    NoFreePort(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 검증 에러
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("replica count must be at least 1")]
    NoReplicas,

    #[error("call timeout must be greater than 0")]
    ZeroTimeout,

    #[error("client id must be a nonzero u32")]
    ZeroClientId,

    #[error("min delay {min}ms must be below max delay {max}ms")]
    DelayRange { min: u64, max: u64 },
}

/// 대화형 명령 해석 에러
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command not recognized :(")]
    Unknown,

    #[error("Missing parameters - 4 are expected")]
    MissingParameters,

    #[error("The {position} parameter of '{command}' MUST be a {expected}")]
    InvalidNumber {
        command: char,
        position: &'static str,
        expected: &'static str,
    },
}
