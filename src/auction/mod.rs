/// 경매 도메인
/// 1. 데이터 모델 (경매 기록, Ack, Outcome, 요청)
/// 2. 레플리카 로컬 상태 기계
pub mod model;
pub mod state_machine;

pub use model::{
    Ack, AckStatus, Amount, Auction, BidRequest, BidderId, Outcome, StartAuctionRequest, NO_BIDDER,
};
pub use state_machine::AuctionStateMachine;
