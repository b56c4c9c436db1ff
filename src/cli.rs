//! 클라이언트 프런트엔드
//!
//! 사용자 입력이나 난수를 `ReplicaSetClient` 호출로 바꾸기만 한다.
//! 레플리카 내부에는 손대지 않는다.
// region:    --- Imports
use crate::auction::Amount;
use crate::client::ReplicaSetClient;
use crate::error::{ClientError, CommandError};
use rand::Rng;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info};

// endregion: --- Imports

pub const HELP: &str = "\
| 'h' displays commands & their syntax
| 'b *amount' bids on auction, with * being a number
|     if amount is empty, then we assume that we want to increment bid by 1
| 'r' gets the result of the active (or last) auction
| 's *start *duration *name' starts an auction lasting duration, for item with name, & starting bid";

/// 자동 모드에서 만들 수 있는 최대 경매 기간 (ms, 미포함)
pub const AUTO_MAX_DURATION_MS: u32 = 65_535;

// region:    --- Command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// 금액이 없으면 현재 최고가 + 1
    Bid(Option<Amount>),
    Result,
    Start {
        start_bid: Amount,
        duration_ms: u32,
        item_name: String,
    },
}

impl Command {
    /// 한 줄 해석. 빈 줄은 `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let input: Vec<&str> = line.split_whitespace().collect();
        let Some(head) = input.first() else {
            return Ok(None);
        };

        let command = match *head {
            "h" => Command::Help,
            "r" => Command::Result,
            "b" => match input.get(1) {
                None => Command::Bid(None),
                Some(raw) => Command::Bid(Some(raw.parse().map_err(|_| {
                    CommandError::InvalidNumber {
                        command: 'b',
                        position: "second",
                        expected: "uint64",
                    }
                })?)),
            },
            "s" => {
                if input.len() < 4 {
                    return Err(CommandError::MissingParameters);
                }
                let start_bid = input[1].parse().map_err(|_| CommandError::InvalidNumber {
                    command: 's',
                    position: "second",
                    expected: "uint64",
                })?;
                let duration_ms = input[2].parse().map_err(|_| CommandError::InvalidNumber {
                    command: 's',
                    position: "third",
                    expected: "uint32",
                })?;
                Command::Start {
                    start_bid,
                    duration_ms,
                    item_name: input[3..].join(" "),
                }
            }
            _ => return Err(CommandError::Unknown),
        };
        Ok(Some(command))
    }
}

/// 명령 실행. 출력할 문자열을 돌려준다.
pub async fn execute(client: &mut ReplicaSetClient, command: Command) -> Result<String, ClientError> {
    Ok(match command {
        Command::Help => HELP.to_string(),
        Command::Bid(Some(amount)) => client.send_bid(amount).await?.to_string(),
        Command::Bid(None) => {
            let highest = client.get_results().await?.amount;
            client.send_bid(highest.saturating_add(1)).await?.to_string()
        }
        Command::Result => client.get_results().await?.to_string(),
        Command::Start {
            start_bid,
            duration_ms,
            item_name,
        } => client
            .start_auction(start_bid, duration_ms, item_name)
            .await?
            .to_string(),
    })
}
// endregion: --- Command

// region:    --- Interactive
/// 대화형 루프. 입력이 끝나면 정상 종료, 레플리카가 모두 사라지면 에러로 끝난다.
pub async fn run_interactive<R>(client: &mut ReplicaSetClient, input: R) -> Result<(), ClientError>
where
    R: AsyncBufRead + Unpin,
{
    println!("-- Enter 'h' for help --");
    let mut lines = input.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("{:<12} --> 입력 읽기 실패: {}", "Client", e);
                break;
            }
        };
        match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                let output = execute(client, command).await?;
                info!("{:<12} --> {}", "Client", output);
                println!("{output}");
            }
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}
// endregion: --- Interactive

// region:    --- Auto Driver
/// 주사위 값 (0..10) 을 명령으로 바꾼다. 4 이상은 아무것도 하지 않는다.
pub fn auto_command<G: Rng>(roll: u32, client_id: u32, rng: &mut G) -> Option<Command> {
    match roll {
        0 => Some(Command::Bid(None)),
        1 => Some(Command::Bid(Some(rng.gen()))),
        2 => Some(Command::Result),
        3 => Some(Command::Start {
            start_bid: rng.gen(),
            duration_ms: rng.gen_range(0..AUTO_MAX_DURATION_MS),
            item_name: format!("item-{client_id}"),
        }),
        _ => None,
    }
}

/// 무작위 자동 클라이언트. 레플리카가 모두 사라질 때까지 돈다.
pub async fn run_auto<G: Rng>(
    client: &mut ReplicaSetClient,
    rng: &mut G,
    min_delay: Duration,
    max_delay: Duration,
) -> Result<(), ClientError> {
    let min_ms = u64::try_from(min_delay.as_millis()).unwrap_or(u64::MAX - 1);
    let max_ms = u64::try_from(max_delay.as_millis())
        .unwrap_or(u64::MAX)
        .max(min_ms + 1);
    loop {
        let roll = rng.gen_range(0..10);
        if let Some(command) = auto_command(roll, client.bidder_id(), rng) {
            let output = execute(client, command).await?;
            info!("{:<12} --> {}", "AutoClient", output);
        }
        let pause = rng.gen_range(min_ms..max_ms);
        tokio::time::sleep(Duration::from_millis(pause)).await;
    }
}
// endregion: --- Auto Driver
