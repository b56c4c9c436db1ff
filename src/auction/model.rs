// region:    --- Imports
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

// endregion: --- Imports

/// 입찰자 식별자. `0` 은 "입찰자 없음" 을 뜻한다.
pub type BidderId = u32;
pub type Amount = u64;

pub const NO_BIDDER: BidderId = 0;

// region:    --- Auction
/// 레플리카 로컬 경매 기록
///
/// 마지막 기록만 변경될 수 있으며, 변경은 `highest_bid` 와 `bidder` 를 함께 바꾸는 것뿐이다.
#[derive(Debug, Clone)]
pub struct Auction {
    pub item: String,
    pub highest_bid: Amount,
    pub bidder: BidderId,
    /// 이 레플리카에서만 의미가 있는 시작 시각
    pub started_at: Instant,
    pub duration_ms: u32,
}

impl Auction {
    pub fn open(item: String, start_bid: Amount, duration_ms: u32, now: Instant) -> Self {
        Self {
            item,
            highest_bid: start_bid,
            bidder: NO_BIDDER,
            started_at: now,
            duration_ms,
        }
    }

    /// 시작 후 경과 시간 (ms)
    pub fn elapsed_ms(&self, now: Instant) -> u128 {
        now.saturating_duration_since(self.started_at).as_millis()
    }

    /// 입찰/신규 경매 판단용 종료 여부: 경과 시간이 기간을 "초과" 해야 종료
    pub fn is_closed_for_bids(&self, now: Instant) -> bool {
        self.elapsed_ms(now) > u128::from(self.duration_ms)
    }

    /// 결과 조회용 남은 시간: 경과 시간이 기간 "이상" 이면 0
    pub fn left_ms(&self, now: Instant) -> u32 {
        let elapsed = self.elapsed_ms(now);
        let duration = u128::from(self.duration_ms);
        if elapsed >= duration {
            0
        } else {
            // elapsed < duration <= u32::MAX
            (duration - elapsed) as u32
        }
    }
}
// endregion: --- Auction

// region:    --- Ack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AckStatus {
    Success,
    /// 일반적인 업무상 거절 (낮은 입찰가, 진행 중인 경매)
    Fail,
    /// 전제 조건 위반 (경매 없음, 경매 종료)
    Exception,
}

/// 변경 요청의 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: AckStatus,
    pub message: String,
}

impl Ack {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: AckStatus::Success,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: AckStatus::Fail,
            message: message.into(),
        }
    }

    pub fn exception(message: impl Into<String>) -> Self {
        Self {
            status: AckStatus::Exception,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AckStatus::Success
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.status, self.message)
    }
}
// endregion: --- Ack

// region:    --- Outcome
/// 결과 조회 응답. 모든 필드가 비어 있으면 "경매가 한 번도 열리지 않음" 을 뜻한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub left_ms: u32,
    pub amount: Amount,
    pub bidder_id: BidderId,
    pub item_name: String,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        *self == Outcome::default()
    }

    pub fn is_running(&self) -> bool {
        self.left_ms > 0
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "There is no active auction");
        }
        match (self.is_running(), self.bidder_id != NO_BIDDER) {
            (true, true) => write!(
                f,
                "| Auction for '{}' has {}ms left\n| Highest bid (by id {}) is {}",
                self.item_name, self.left_ms, self.bidder_id, self.amount
            ),
            (true, false) => write!(
                f,
                "| Auction for '{}' has {}ms left\n| Starting bid is {}",
                self.item_name, self.left_ms, self.amount
            ),
            (false, true) => write!(
                f,
                "| Auction for '{}' was won (by id {}) for {}",
                self.item_name, self.bidder_id, self.amount
            ),
            (false, false) => write!(
                f,
                "| Auction for '{}' did not sell\n| Starting bid was {}",
                self.item_name, self.amount
            ),
        }
    }
}
// endregion: --- Outcome

// region:    --- Requests
/// 경매 시작 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartAuctionRequest {
    pub start_bid: Amount,
    pub duration_ms: u32,
    pub item_name: String,
}

/// 입찰 요청
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRequest {
    pub bidder_id: BidderId,
    pub amount: Amount,
}
// endregion: --- Requests
