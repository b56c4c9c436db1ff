// region:    --- Imports
use super::{handlers, Replica};
use crate::error::ServerError;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Server

/// 레플리카 라우터
pub fn router(replica: Arc<Replica>) -> Router {
    Router::new()
        .route("/auction/start", post(handlers::handle_start_auction))
        .route("/auction/bid", post(handlers::handle_bid))
        .route("/auction/result", get(handlers::handle_result))
        .route("/ping", get(handlers::handle_ping))
        .layer(TraceLayer::new_for_http())
        .with_state(replica)
}

/// `base_port` 부터 비어 있는 포트를 찾아 바인딩한다 (실패하면 port++)
pub async fn bind_from(host: &str, base_port: u16) -> Result<TcpListener, ServerError> {
    let mut port = base_port;
    loop {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => {
                info!("{:<12} --> 포트 {} 에서 리스너 생성", "Server", port);
                return Ok(listener);
            }
            Err(e) => {
                warn!(
                    "{:<12} --> 포트 {} 바인딩 실패 ({}), 다음 포트 시도",
                    "Server", port, e
                );
                port = port
                    .checked_add(1)
                    .ok_or(ServerError::NoFreePort(base_port))?;
            }
        }
    }
}

/// 서버 실행
pub async fn serve(listener: TcpListener, replica: Arc<Replica>) -> Result<(), ServerError> {
    info!(
        "{:<12} --> 레플리카 [{}] 시작: {}",
        "Server",
        replica.name(),
        listener.local_addr()?
    );
    axum::serve(listener, router(replica).into_make_service()).await?;
    Ok(())
}

// endregion: --- Server

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_skips_ports_in_use() {
        let taken = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let taken_port = taken.local_addr().unwrap().port();

        let listener = bind_from("127.0.0.1", taken_port).await.unwrap();
        assert!(listener.local_addr().unwrap().port() > taken_port);
    }
}
