// region:    --- Imports
use super::connection::{ReplicaConnection, ReplicaDescriptor, SharedReplica};
use super::probe::HealthProbe;
use crate::auction::{Ack, BidRequest, Outcome, StartAuctionRequest};
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Http Replica
/// HTTP/JSON 으로 레플리카를 호출하는 연결
pub struct HttpReplica {
    descriptor: ReplicaDescriptor,
    base_url: String,
    client: Client,
}

impl HttpReplica {
    /// `descriptor.address` 는 `host:port` 형식
    pub fn new(descriptor: ReplicaDescriptor, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::transport(&descriptor, e))?;
        Ok(Self {
            base_url: format!("http://{}", descriptor.address),
            descriptor,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Result<reqwest::Response>,
    ) -> Result<T, ClientError> {
        response
            .and_then(|r| r.error_for_status())
            .map_err(|e| ClientError::transport(&self.descriptor, e))?
            .json::<T>()
            .await
            .map_err(|e| ClientError::transport(&self.descriptor, e))
    }
}

#[async_trait]
impl ReplicaConnection for HttpReplica {
    fn descriptor(&self) -> &ReplicaDescriptor {
        &self.descriptor
    }

    async fn ping(&self) -> Result<(), ClientError> {
        self.client
            .get(self.url("/ping"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ClientError::transport(&self.descriptor, e))?;
        Ok(())
    }

    async fn start_auction(&self, request: &StartAuctionRequest) -> Result<Ack, ClientError> {
        let response = self
            .client
            .post(self.url("/auction/start"))
            .json(request)
            .send()
            .await;
        self.decode(response).await
    }

    async fn bid(&self, request: &BidRequest) -> Result<Ack, ClientError> {
        let response = self
            .client
            .post(self.url("/auction/bid"))
            .json(request)
            .send()
            .await;
        self.decode(response).await
    }

    async fn result(&self) -> Result<Outcome, ClientError> {
        let response = self.client.get(self.url("/auction/result")).send().await;
        self.decode(response).await
    }
}
// endregion: --- Http Replica

// region:    --- Discovery
/// 고정된 레플리카 집합 탐색
///
/// `host:base_port` 부터 `count` 개의 포트를 한 번씩 probe 하고 응답한 것만 돌려준다.
/// 하나도 없으면 `NoReplicaAvailable`.
pub async fn discover(
    host: &str,
    base_port: u16,
    count: u16,
    timeout: Duration,
) -> Result<Vec<SharedReplica>, ClientError> {
    let probe = HealthProbe::new(timeout);
    let mut found: Vec<SharedReplica> = Vec::new();

    for offset in 0..count {
        let Some(port) = base_port.checked_add(offset) else {
            break;
        };
        let descriptor = ReplicaDescriptor::new(usize::from(offset), format!("{host}:{port}"));
        let replica = HttpReplica::new(descriptor, timeout)?;

        match probe.check(&replica).await {
            Ok(()) => {
                info!("{:<12} --> {} 연결 성공", "Discovery", replica.descriptor());
                found.push(Arc::new(replica));
            }
            Err(e) => warn!("{:<12} --> 연결 실패: {}", "Discovery", e),
        }
    }

    if found.is_empty() {
        return Err(ClientError::NoReplicaAvailable);
    }
    Ok(found)
}
// endregion: --- Discovery
