//! 레플리카 로컬 경매 상태 기계
//!
//! 시각은 항상 호출자가 넘겨준다. 잠금과 지연 해제는 `replica` 모듈이 담당하고,
//! 여기서는 상태 전이만 다룬다.
// region:    --- Imports
use super::model::{Ack, Auction, BidRequest, Outcome, StartAuctionRequest};
use tokio::time::Instant;

// endregion: --- Imports

pub const MSG_STARTED: &str = "Auction started";
pub const MSG_ALREADY_RUNNING: &str = "An auction is already running";
pub const MSG_NO_AUCTION: &str = "No active auction to bid on";
pub const MSG_AUCTION_OVER: &str = "Auction is over";
pub const MSG_BID_ACCEPTED: &str = "Bid increased";
pub const MSG_BID_TOO_LOW: &str = "Bid is lower than the highest bid";

// region:    --- State Machine
/// 추가만 가능한 경매 기록 목록
#[derive(Debug, Default)]
pub struct AuctionStateMachine {
    auctions: Vec<Auction>,
}

impl AuctionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 열린 모든 경매 (오래된 순)
    pub fn auctions(&self) -> &[Auction] {
        &self.auctions
    }

    pub fn current(&self) -> Option<&Auction> {
        self.auctions.last()
    }

    /// 경매 시작
    ///
    /// 마지막 경매가 아직 입찰을 받는 중이면 거절하고 아무것도 추가하지 않는다.
    pub fn start_auction(&mut self, request: StartAuctionRequest, now: Instant) -> Ack {
        if let Some(last) = self.auctions.last() {
            if !last.is_closed_for_bids(now) {
                return Ack::fail(MSG_ALREADY_RUNNING);
            }
        }
        self.auctions.push(Auction::open(
            request.item_name,
            request.start_bid,
            request.duration_ms,
            now,
        ));
        Ack::success(MSG_STARTED)
    }

    /// 입찰
    pub fn bid(&mut self, request: BidRequest, now: Instant) -> Ack {
        let Some(last) = self.auctions.last_mut() else {
            return Ack::exception(MSG_NO_AUCTION);
        };
        if last.is_closed_for_bids(now) {
            return Ack::exception(MSG_AUCTION_OVER);
        }
        if request.amount > last.highest_bid {
            last.bidder = request.bidder_id;
            last.highest_bid = request.amount;
            Ack::success(MSG_BID_ACCEPTED)
        } else {
            Ack::fail(MSG_BID_TOO_LOW)
        }
    }

    /// 결과 조회. 종료 여부와 관계없이 마지막 경매를 돌려준다.
    pub fn result(&self, now: Instant) -> Outcome {
        match self.auctions.last() {
            None => Outcome::default(),
            Some(last) => Outcome {
                left_ms: last.left_ms(now),
                amount: last.highest_bid,
                bidder_id: last.bidder,
                item_name: last.item.clone(),
            },
        }
    }
}
// endregion: --- State Machine
