/// 레플리카
/// 1. 배타적 접근 래퍼 (`Replica`)
/// 2. 잠금 해제 지연 정책
/// 3. HTTP 핸들러와 서버 기동
// region:    --- Imports
use crate::auction::{Ack, Auction, AuctionStateMachine, BidRequest, Outcome, StartAuctionRequest};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::info;

// endregion: --- Imports

// region:    --- Modules
pub mod handlers;
pub mod lock_policy;
pub mod server;

pub use lock_policy::LockReleasePolicy;
pub use server::{bind_from, router, serve};

// endregion: --- Modules

// region:    --- Replica
/// 한 레플리카의 경매 상태를 소유하는 래퍼
///
/// 상태 기계는 하나의 잠금 뒤에만 있고, 참조가 밖으로 나가지 않는다.
/// 조회도 같은 잠금을 잡는다. `ping` 만 잠금 없이 응답한다.
pub struct Replica {
    name: String,
    state: Arc<Mutex<AuctionStateMachine>>,
    policy: LockReleasePolicy,
}

impl Replica {
    pub fn new(name: impl Into<String>, policy: LockReleasePolicy) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(AuctionStateMachine::new())),
            policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> LockReleasePolicy {
        self.policy
    }

    /// 경매 시작
    pub async fn start_auction(&self, request: StartAuctionRequest) -> Ack {
        let mut state = Arc::clone(&self.state).lock_owned().await;
        let item = request.item_name.clone();
        let duration_ms = request.duration_ms;

        let ack = state.start_auction(request, Instant::now());
        if ack.is_success() {
            info!(
                "{:<12} --> [{}] 경매 시작 '{}', 기간: {}ms",
                "Replica", self.name, item, duration_ms
            );
        } else {
            let running = state.current().map(|a| a.item.clone()).unwrap_or_default();
            info!(
                "{:<12} --> [{}] 경매 '{}' 거절: '{}' 진행 중",
                "Replica", self.name, item, running
            );
        }

        self.policy.release(state);
        ack
    }

    /// 입찰
    pub async fn bid(&self, request: BidRequest) -> Ack {
        let mut state = Arc::clone(&self.state).lock_owned().await;
        info!(
            "{:<12} --> [{}] 입찰 요청 id: {}, 금액: {}",
            "Replica", self.name, request.bidder_id, request.amount
        );

        let ack = state.bid(request, Instant::now());
        info!(
            "{:<12} --> [{}] id {} 에게 응답: {}",
            "Replica", self.name, request.bidder_id, ack
        );

        self.policy.release(state);
        ack
    }

    /// 결과 조회
    pub async fn result(&self) -> Outcome {
        let state = Arc::clone(&self.state).lock_owned().await;

        let outcome = state.result(Instant::now());
        if outcome.is_empty() {
            info!("{:<12} --> [{}] 열린 경매 없음", "Replica", self.name);
        } else if outcome.is_running() {
            info!(
                "{:<12} --> [{}] 진행 중 '{}' {}ms 남음, 선두 id {}",
                "Replica", self.name, outcome.item_name, outcome.left_ms, outcome.bidder_id
            );
        } else {
            info!(
                "{:<12} --> [{}] 종료된 '{}', 낙찰 id {}",
                "Replica", self.name, outcome.item_name, outcome.bidder_id
            );
        }

        self.policy.release(state);
        outcome
    }

    /// 생존 확인. 잠금을 잡지 않는다.
    pub fn ping(&self) {}

    /// 진단용 경매 기록 복사본. 정책과 무관하게 즉시 해제한다.
    pub async fn auctions(&self) -> Vec<Auction> {
        self.state.lock().await.auctions().to_vec()
    }
}
// endregion: --- Replica
