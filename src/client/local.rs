//! 프로세스 내부 레플리카 연결
//!
//! 네트워크 없이 `Replica` 를 직접 호출한다. 링크 상태를 바꿔서 죽은 레플리카
//! (즉시 실패), 응답 없는 레플리카 (타임아웃), ping 에만 답하는 레플리카를 흉내 낼 수 있다.
// region:    --- Imports
use super::connection::{ReplicaConnection, ReplicaDescriptor};
use crate::auction::{Ack, BidRequest, Outcome, StartAuctionRequest};
use crate::error::ClientError;
use crate::replica::{LockReleasePolicy, Replica};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

// endregion: --- Imports

const LINK_UP: u8 = 0;
const LINK_DOWN: u8 = 1;
const LINK_HUNG: u8 = 2;
const LINK_PING_ONLY: u8 = 3;

pub struct LocalReplica {
    descriptor: ReplicaDescriptor,
    replica: Arc<Replica>,
    link: AtomicU8,
}

impl LocalReplica {
    pub fn new(descriptor: ReplicaDescriptor, replica: Arc<Replica>) -> Self {
        Self {
            descriptor,
            replica,
            link: AtomicU8::new(LINK_UP),
        }
    }

    /// 즉시 해제 정책의 새 레플리카와 연결
    pub fn spawn(descriptor: ReplicaDescriptor) -> Self {
        let replica = Replica::new(descriptor.address.clone(), LockReleasePolicy::Immediate);
        Self::new(descriptor, Arc::new(replica))
    }

    pub fn replica(&self) -> &Arc<Replica> {
        &self.replica
    }

    /// 이후 호출은 곧바로 연결 실패
    pub fn kill(&self) {
        self.link.store(LINK_DOWN, Ordering::SeqCst);
    }

    /// 이후 호출은 응답하지 않는다
    pub fn hang(&self) {
        self.link.store(LINK_HUNG, Ordering::SeqCst);
    }

    /// ping 은 통과하고 경매 호출만 실패한다
    pub fn fail_calls(&self) {
        self.link.store(LINK_PING_ONLY, Ordering::SeqCst);
    }

    async fn reachable(&self) -> Result<(), ClientError> {
        match self.link.load(Ordering::SeqCst) {
            LINK_UP | LINK_PING_ONLY => Ok(()),
            LINK_DOWN => Err(ClientError::transport(&self.descriptor, "connection refused")),
            _ => std::future::pending().await,
        }
    }

    async fn serving(&self) -> Result<(), ClientError> {
        match self.link.load(Ordering::SeqCst) {
            LINK_PING_ONLY => Err(ClientError::transport(&self.descriptor, "connection reset")),
            _ => self.reachable().await,
        }
    }
}

#[async_trait]
impl ReplicaConnection for LocalReplica {
    fn descriptor(&self) -> &ReplicaDescriptor {
        &self.descriptor
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.reachable().await?;
        self.replica.ping();
        Ok(())
    }

    async fn start_auction(&self, request: &StartAuctionRequest) -> Result<Ack, ClientError> {
        self.serving().await?;
        Ok(self.replica.start_auction(request.clone()).await)
    }

    async fn bid(&self, request: &BidRequest) -> Result<Ack, ClientError> {
        self.serving().await?;
        Ok(self.replica.bid(*request).await)
    }

    async fn result(&self) -> Result<Outcome, ClientError> {
        self.serving().await?;
        Ok(self.replica.result().await)
    }
}
