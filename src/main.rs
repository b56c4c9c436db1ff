// region:    --- Imports
use anyhow::Result;
use clap::Parser;
use replicated_auction::config::ReplicaConfig;
use replicated_auction::logging;
use replicated_auction::replica::{self, Replica};
use std::sync::Arc;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<()> {
    let config = ReplicaConfig::parse();

    // logging 초기화 (파일은 포트가 정해진 뒤에 붙인다)
    let log_file = logging::init()?;

    // 비어 있는 포트 찾기
    let listener = replica::bind_from(&config.host, config.base_port).await?;
    let port = listener.local_addr()?.port();

    if let Some(path) = config.log_path(port) {
        if let Err(e) = log_file.attach(&path) {
            error!(
                "{:<12} --> 로그 파일 열기 실패 {}: {}",
                "Main",
                path.display(),
                e
            );
        }
    }

    // 레플리카 생성 및 서버 실행
    let replica = Arc::new(Replica::new(port.to_string(), config.lock_policy()));
    info!(
        "{:<12} --> 잠금 해제 정책: {:?}",
        "Main",
        replica.policy()
    );
    if let Err(err) = replica::serve(listener, replica).await {
        error!("{:<12} --> Server error: {}", "Main", err);
        return Err(err.into());
    }
    Ok(())
}
// endregion: --- Main
