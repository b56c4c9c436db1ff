/// 레플리카 집합 클라이언트
/// 1. 레플리카 연결 트레이트와 전송 구현 (HTTP, 프로세스 내부)
/// 2. 헬스 프로브
/// 3. 응답 집계 정책
/// 4. 브로드캐스트 클라이언트 (`ReplicaSetClient`)
// region:    --- Imports
use crate::auction::{Ack, Amount, BidRequest, BidderId, Outcome, StartAuctionRequest, NO_BIDDER};
use crate::error::ClientError;
use futures::future::{join_all, BoxFuture};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

// endregion: --- Imports

// region:    --- Modules
pub mod aggregation;
pub mod connection;
pub mod http;
pub mod local;
pub mod probe;

pub use aggregation::AggregationPolicy;
pub use connection::{with_timeout, ReplicaConnection, ReplicaDescriptor, SharedReplica};
pub use http::{discover, HttpReplica};
pub use local::LocalReplica;
pub use probe::HealthProbe;

// endregion: --- Modules

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(1);

// region:    --- Replica Set Client
/// 고정된 레플리카 집합에 명령을 브로드캐스트하는 클라이언트
///
/// 추적 집합은 시작 후 줄어들기만 한다. 한 번 빠진 레플리카는 다시 들어오지 않는다.
/// 한 인스턴스는 한 태스크에서만 쓴다고 가정한다 (`&mut self`).
pub struct ReplicaSetClient {
    bidder_id: BidderId,
    replicas: Vec<SharedReplica>,
    probe: HealthProbe,
    call_timeout: Duration,
    policy: AggregationPolicy,
}

impl ReplicaSetClient {
    pub fn new(
        bidder_id: BidderId,
        replicas: Vec<SharedReplica>,
        call_timeout: Duration,
    ) -> Result<Self, ClientError> {
        if bidder_id == NO_BIDDER {
            return Err(ClientError::InvalidBidderId);
        }
        Ok(Self {
            bidder_id,
            replicas,
            probe: HealthProbe::new(call_timeout),
            call_timeout,
            policy: AggregationPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: AggregationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn bidder_id(&self) -> BidderId {
        self.bidder_id
    }

    /// 현재 추적 중인 레플리카 (추적 순서)
    pub fn replicas(&self) -> Vec<ReplicaDescriptor> {
        self.replicas.iter().map(|r| r.descriptor().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.replicas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicas.is_empty()
    }

    /// 죽은 레플리카 제거
    ///
    /// 모든 레플리카에 ping 을 한 번씩 동시에 보내고, 실패하거나 타임아웃된 것을 뺀다.
    /// 살아남은 것들의 순서는 유지된다. 제거된 레플리카 목록을 돌려준다.
    ///
    /// 매 호출 전에 정리하는 것과 전혀 정리하지 않는 것 사이에는 서로 다른 경쟁 구간이 있다.
    /// - 정리 후 브로드캐스트: 방금 정리한 클라이언트 A 는 타임아웃 없이 살아 있는
    ///   레플리카에 도달하고, 아직 죽은 레플리카를 들고 있는 클라이언트 B 는 1초를 기다린다.
    ///   B 가 먼저 요청했더라도 뒤쪽 레플리카에는 A 의 명령이 먼저 도착할 수 있다.
    /// - 정리하지 않음: 죽은 레플리카에서 타임아웃을 기다리는 사이 경매 마감이 지나서,
    ///   같은 입찰이 앞쪽 레플리카에서는 성공하고 뒤쪽에서는 종료로 거절될 수 있다.
    ///
    /// 둘 다 합의 없는 브로드캐스트의 본질적 한계이고, 여기서는 매번 정리하는 쪽을 택한다.
    pub async fn purge_dead_replicas(&mut self) -> Vec<ReplicaDescriptor> {
        let probe = self.probe;
        let checks = self.replicas.iter().map(|r| probe.check(r.as_ref()));
        let results = join_all(checks).await;

        let mut removed = Vec::new();
        let replicas = std::mem::take(&mut self.replicas);
        for (replica, result) in replicas.into_iter().zip(results) {
            match result {
                Ok(()) => self.replicas.push(replica),
                Err(e) => {
                    warn!("{:<12} --> 죽은 레플리카 제거: {}", "Purge", e);
                    removed.push(replica.descriptor().clone());
                }
            }
        }
        removed
    }

    /// 입찰
    pub async fn send_bid(&mut self, amount: Amount) -> Result<Ack, ClientError> {
        let request = BidRequest {
            bidder_id: self.bidder_id,
            amount,
        };
        self.purge_dead_replicas().await;
        self.broadcast("Bid", move |replica| {
            Box::pin(async move { replica.bid(&request).await })
        })
        .await
    }

    /// 경매 시작
    pub async fn start_auction(
        &mut self,
        start_bid: Amount,
        duration_ms: u32,
        item_name: impl Into<String>,
    ) -> Result<Ack, ClientError> {
        let request = StartAuctionRequest {
            start_bid,
            duration_ms,
            item_name: item_name.into(),
        };
        self.purge_dead_replicas().await;
        self.broadcast("StartAuction", move |replica| {
            let request = request.clone();
            Box::pin(async move { replica.start_auction(&request).await })
        })
        .await
    }

    /// 결과 조회
    pub async fn get_results(&mut self) -> Result<Outcome, ClientError> {
        self.purge_dead_replicas().await;
        self.broadcast("Result", |replica| {
            Box::pin(async move { replica.result().await })
        })
        .await
    }

    /// 추적 중인 모든 레플리카에 동시에 호출하고 응답을 모은다
    ///
    /// 각 호출에는 독립된 타임아웃이 걸린다. 실패한 레플리카는 추적 집합에서 빠지고,
    /// 성공 응답 중 집계 정책이 고른 것을 돌려준다. 성공이 하나도 없으면 `NoReplicaAvailable`.
    async fn broadcast<T, F>(&mut self, operation: &'static str, call: F) -> Result<T, ClientError>
    where
        T: Debug + Send + 'static,
        F: Fn(SharedReplica) -> BoxFuture<'static, Result<T, ClientError>>,
    {
        let timeout = self.call_timeout;
        let calls = self.replicas.iter().map(|replica| {
            with_timeout(
                replica.descriptor().clone(),
                timeout,
                call(Arc::clone(replica)),
            )
        });
        let results = join_all(calls).await;

        let mut successes = Vec::with_capacity(results.len());
        let replicas = std::mem::take(&mut self.replicas);
        for (replica, result) in replicas.into_iter().zip(results) {
            match result {
                Ok(response) => {
                    debug!(
                        "{:<12} --> {} | {} | {:?}",
                        "Broadcast",
                        operation,
                        replica.descriptor(),
                        response
                    );
                    successes.push(response);
                    self.replicas.push(replica);
                }
                Err(e) => {
                    warn!(
                        "{:<12} --> {} | 레플리카 제거: {}",
                        "Broadcast", operation, e
                    );
                }
            }
        }

        self.policy
            .select(successes)
            .ok_or(ClientError::NoReplicaAvailable)
    }
}
// endregion: --- Replica Set Client
