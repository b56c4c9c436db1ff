/// 헬스 프로브
///
/// 시스템의 유일한 장애 감지기. 한 번 시도하고, 고정 타임아웃이며, 재시도나 백오프가 없다.
/// 한 번 실패한 레플리카는 클라이언트 프로세스가 끝날 때까지 죽은 것으로 본다.
// region:    --- Imports
use super::connection::{with_timeout, ReplicaConnection};
use crate::error::ClientError;
use std::time::Duration;

// endregion: --- Imports

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct HealthProbe {
    timeout: Duration,
}

impl Default for HealthProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl HealthProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// ping 한 번
    pub async fn check(&self, replica: &dyn ReplicaConnection) -> Result<(), ClientError> {
        with_timeout(replica.descriptor().clone(), self.timeout, replica.ping()).await
    }
}
