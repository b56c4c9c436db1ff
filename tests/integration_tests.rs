use axum::body::Body;
use axum::http::{Request, StatusCode};
use replicated_auction::auction::{Ack, AckStatus, Outcome};
use replicated_auction::client::{
    self, HttpReplica, ReplicaConnection, ReplicaDescriptor, ReplicaSetClient, SharedReplica,
};
use replicated_auction::error::ClientError;
use replicated_auction::replica::{self, LockReleasePolicy, Replica};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tracing::info;

const CALL_TIMEOUT: Duration = Duration::from_millis(1_000);

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 임시 포트에 레플리카 서버 실행
async fn spawn_replica(policy: LockReleasePolicy) -> (String, Arc<Replica>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let replica = Arc::new(Replica::new(address.port().to_string(), policy));
    tokio::spawn(replica::serve(listener, Arc::clone(&replica)));
    (address.to_string(), replica)
}

/// 아무도 듣지 않는 주소
async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);
    address
}

fn connect(addresses: &[String]) -> Vec<SharedReplica> {
    addresses
        .iter()
        .enumerate()
        .map(|(i, address)| {
            let replica = HttpReplica::new(ReplicaDescriptor::new(i, address.clone()), CALL_TIMEOUT)
                .unwrap();
            Arc::new(replica) as SharedReplica
        })
        .collect()
}

async fn spawn_cluster(count: usize) -> (Vec<String>, Vec<Arc<Replica>>) {
    let mut addresses = Vec::new();
    let mut replicas = Vec::new();
    for _ in 0..count {
        let (address, replica) = spawn_replica(LockReleasePolicy::default()).await;
        addresses.push(address);
        replicas.push(replica);
    }
    (addresses, replicas)
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// 라우트 직접 호출
#[tokio::test]
async fn test_routes() {
    let app = replica::router(Arc::new(Replica::new("routes", LockReleasePolicy::Immediate)));

    let response = app
        .clone()
        .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(Request::get("/auction/result").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let outcome: Outcome = read_json(response).await;
    assert!(outcome.is_empty());

    let response = app
        .clone()
        .oneshot(
            Request::post("/auction/bid")
                .header("content-type", "application/json")
                .body(Body::from(json!({"bidder_id": 1, "amount": 5}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let ack: Ack = read_json(response).await;
    assert_eq!(ack.status, AckStatus::Exception);

    let response = app
        .clone()
        .oneshot(
            Request::post("/auction/start")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"start_bid": 10, "duration_ms": 60000, "item_name": "globe"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let ack: Ack = read_json(response).await;
    assert_eq!(ack.status, AckStatus::Success);

    let response = app
        .oneshot(Request::get("/auction/result").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body: serde_json::Value = read_json(response).await;
    assert_eq!(body["item_name"], "globe");
    assert_eq!(body["amount"], 10);
    assert_eq!(body["bidder_id"], 0);
}

/// 경매 사이클 테스트 (HTTP, 레플리카 3개)
#[tokio::test]
async fn test_auction_lifecycle() {
    init_tracing();
    let (addresses, replicas) = spawn_cluster(3).await;
    let mut client = ReplicaSetClient::new(7, connect(&addresses), CALL_TIMEOUT).unwrap();

    assert!(client.get_results().await.unwrap().is_empty());
    assert!(client.start_auction(10, 300, "widget").await.unwrap().is_success());

    let ack = client.send_bid(20).await.unwrap();
    assert_eq!(ack.status, AckStatus::Success);
    let ack = client.send_bid(15).await.unwrap();
    assert_eq!(ack.status, AckStatus::Fail);

    // 경매 종료 대기
    tokio::time::sleep(Duration::from_millis(450)).await;

    let ack = client.send_bid(30).await.unwrap();
    assert_eq!(ack.status, AckStatus::Exception);

    let outcome = client.get_results().await.unwrap();
    assert_eq!(
        outcome,
        Outcome {
            left_ms: 0,
            amount: 20,
            bidder_id: 7,
            item_name: "widget".to_string(),
        }
    );

    for replica in &replicas {
        let auctions = replica.auctions().await;
        assert_eq!(auctions.len(), 1);
        assert_eq!(auctions[0].highest_bid, 20);
    }
    assert_eq!(client.len(), 3);
}

/// 죽은 레플리카 정리 테스트
#[tokio::test]
async fn test_purge_dead_replicas() {
    init_tracing();
    let (mut addresses, replicas) = spawn_cluster(3).await;
    addresses.insert(1, dead_address().await);
    addresses.push(dead_address().await);
    let mut client = ReplicaSetClient::new(3, connect(&addresses), CALL_TIMEOUT).unwrap();
    assert_eq!(client.len(), 5);

    let removed = client.purge_dead_replicas().await;
    let removed_ids: Vec<_> = removed.iter().map(|d| d.id).collect();
    assert_eq!(removed_ids, vec![1, 4]);
    let kept_ids: Vec<_> = client.replicas().iter().map(|d| d.id).collect();
    assert_eq!(kept_ids, vec![0, 2, 3]);

    client.start_auction(1, 60_000, "mirror").await.unwrap();
    let ack = client.send_bid(2).await.unwrap();
    assert!(ack.is_success());
    for replica in &replicas {
        assert_eq!(replica.auctions().await[0].highest_bid, 2);
    }
}

/// 모든 레플리카가 없을 때
#[tokio::test]
async fn test_no_replica_available() {
    let addresses = vec![dead_address().await, dead_address().await];
    let mut client = ReplicaSetClient::new(1, connect(&addresses), CALL_TIMEOUT).unwrap();

    let err = client.send_bid(1).await.unwrap_err();
    assert!(matches!(err, ClientError::NoReplicaAvailable));

    let dead = dead_address().await;
    let port: u16 = dead.rsplit(':').next().unwrap().parse().unwrap();
    let err = client::discover("127.0.0.1", port, 1, CALL_TIMEOUT).await.err();
    assert!(matches!(err, Some(ClientError::NoReplicaAvailable)));
}

/// 탐색 테스트
#[tokio::test]
async fn test_discover_live_replica() {
    let (address, _replica) = spawn_replica(LockReleasePolicy::Immediate).await;
    let port: u16 = address.rsplit(':').next().unwrap().parse().unwrap();

    let found = client::discover("127.0.0.1", port, 1, CALL_TIMEOUT).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].descriptor().address, address);
    assert!(found[0].ping().await.is_ok());
}

/// 동시성 입찰 테스트 (클라이언트 여러 개)
#[tokio::test]
async fn test_concurrent_bidding() {
    init_tracing();
    let (addresses, replicas) = spawn_cluster(3).await;

    let mut opener = ReplicaSetClient::new(100, connect(&addresses), CALL_TIMEOUT).unwrap();
    opener.start_auction(0, 60_000, "painting").await.unwrap();

    let mut handles = vec![];
    for id in 1..=10u32 {
        let addresses = addresses.clone();
        handles.push(tokio::spawn(async move {
            let mut client = ReplicaSetClient::new(id, connect(&addresses), CALL_TIMEOUT).unwrap();
            client.send_bid(u64::from(id) * 1_000).await.unwrap()
        }));
    }

    let mut successful_bids = 0;
    for handle in handles {
        if handle.await.unwrap().is_success() {
            successful_bids += 1;
        }
    }
    info!("성공한 입찰 수: {}", successful_bids);
    assert!(successful_bids >= 1);

    // 순서와 무관하게 최고가는 모든 레플리카에서 같다
    for replica in &replicas {
        let auctions = replica.auctions().await;
        assert_eq!(auctions[0].highest_bid, 10_000);
        assert_eq!(auctions[0].bidder, 10);
    }
}
