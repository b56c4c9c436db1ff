// region:    --- Imports
use crate::auction::{Ack, BidRequest, Outcome, StartAuctionRequest};
use crate::error::ClientError;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

// endregion: --- Imports

// region:    --- Replica Descriptor
/// 레플리카 식별 정보 (로그/진단용)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplicaDescriptor {
    pub id: usize,
    pub address: String,
}

impl ReplicaDescriptor {
    pub fn new(id: usize, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
        }
    }
}

impl fmt::Display for ReplicaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.id, self.address)
    }
}
// endregion: --- Replica Descriptor

// region:    --- Replica Connection
/// 한 레플리카로의 요청/응답 호출
///
/// 구현체는 어떤 전송 실패든 `ClientError` 로 돌려준다. 타임아웃은 호출하는 쪽에서 건다.
#[async_trait]
pub trait ReplicaConnection: Send + Sync {
    fn descriptor(&self) -> &ReplicaDescriptor;

    async fn ping(&self) -> Result<(), ClientError>;
    async fn start_auction(&self, request: &StartAuctionRequest) -> Result<Ack, ClientError>;
    async fn bid(&self, request: &BidRequest) -> Result<Ack, ClientError>;
    async fn result(&self) -> Result<Outcome, ClientError>;
}

pub type SharedReplica = Arc<dyn ReplicaConnection + 'static>;

/// 호출 하나에 고정 타임아웃을 건다. 초과는 연결 실패와 똑같이 취급된다.
pub async fn with_timeout<T, F>(
    replica: ReplicaDescriptor,
    timeout: Duration,
    call: F,
) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout(replica)),
    }
}
// endregion: --- Replica Connection
