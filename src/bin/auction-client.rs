// region:    --- Imports
use anyhow::Result;
use clap::Parser;
use replicated_auction::cli;
use replicated_auction::client::{self, ReplicaSetClient};
use replicated_auction::config::ClientConfig;
use replicated_auction::logging;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::parse();
    config.validate()?;

    // logging 초기화
    let log_file = logging::init()?;
    if let Some(path) = config.log_path() {
        log_file.attach(&path)?;
    }

    // 레플리카 탐색 (응답한 것만 추적)
    let replicas = match client::discover(
        &config.host,
        config.base_port,
        config.replicas,
        config.call_timeout(),
    )
    .await
    {
        Ok(replicas) => replicas,
        Err(e) => {
            error!(
                "{:<12} --> 레플리카를 찾을 수 없음 - 실행 중인지 확인하세요",
                "Main"
            );
            return Err(e.into());
        }
    };
    info!("{:<12} --> 레플리카 {}개 연결", "Main", replicas.len());

    let mut client = ReplicaSetClient::new(config.id, replicas, config.call_timeout())?;

    if config.auto {
        let mut rng = rand::thread_rng();
        cli::run_auto(
            &mut client,
            &mut rng,
            Duration::from_millis(config.min_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
        .await?;
    } else {
        let stdin = BufReader::new(tokio::io::stdin());
        cli::run_interactive(&mut client, stdin).await?;
    }
    Ok(())
}
// endregion: --- Main
