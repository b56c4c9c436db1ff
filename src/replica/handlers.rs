// region:    --- Imports
use super::Replica;
use crate::auction::{Ack, BidRequest, Outcome, StartAuctionRequest};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::debug;

// endregion: --- Imports

// region:    --- Command Handlers

/// 경매 시작 요청 처리
pub async fn handle_start_auction(
    State(replica): State<Arc<Replica>>,
    Json(request): Json<StartAuctionRequest>,
) -> Json<Ack> {
    debug!("{:<12} --> 경매 시작 요청: {:?}", "Handler", request);
    Json(replica.start_auction(request).await)
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State(replica): State<Arc<Replica>>,
    Json(request): Json<BidRequest>,
) -> Json<Ack> {
    debug!("{:<12} --> 입찰 요청: {:?}", "Handler", request);
    Json(replica.bid(request).await)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 결과 조회
pub async fn handle_result(State(replica): State<Arc<Replica>>) -> Json<Outcome> {
    Json(replica.result().await)
}

/// 생존 확인
pub async fn handle_ping(State(replica): State<Arc<Replica>>) -> StatusCode {
    replica.ping();
    StatusCode::OK
}

// endregion: --- Query Handlers
