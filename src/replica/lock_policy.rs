/// 잠금 해제 지연 정책
///
/// 같은 브로드캐스트 명령이라도 레플리카마다 도착 시각이 조금씩 다르다.
/// 응답을 계산한 뒤 잠금을 몇 ms 더 쥐고 있으면, 다른 레플리카에서 먼저 끝난 명령보다
/// 늦게 도착한 경쟁 명령이 이 레플리카에서도 뒤로 줄을 서게 될 확률이 높아진다.
/// 보장은 아니며, 호출마다 지연이 늘어나는 대가가 있다.
// region:    --- Imports
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;

// endregion: --- Imports

pub const DEFAULT_LOCK_DELAY: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReleasePolicy {
    /// 응답 계산 직후 해제
    Immediate,
    /// 응답 후 로컬 sleep 만큼 더 쥐고 있다가 비동기로 해제. 네트워크 대기는 없다.
    Delayed(Duration),
}

impl Default for LockReleasePolicy {
    fn default() -> Self {
        LockReleasePolicy::Delayed(DEFAULT_LOCK_DELAY)
    }
}

impl LockReleasePolicy {
    /// `0` 이면 즉시 해제
    pub fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            LockReleasePolicy::Immediate
        } else {
            LockReleasePolicy::Delayed(Duration::from_millis(millis))
        }
    }

    /// 상태 전이가 끝난 가드를 넘겨받아 정책대로 해제한다.
    ///
    /// 지연 해제는 별도 태스크에서 일어나므로 호출자는 곧바로 응답할 수 있다.
    pub fn release<T>(self, guard: OwnedMutexGuard<T>)
    where
        T: Send + 'static,
    {
        match self {
            LockReleasePolicy::Immediate => drop(guard),
            LockReleasePolicy::Delayed(delay) => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    drop(guard);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[test]
    fn zero_millis_means_immediate() {
        assert_eq!(LockReleasePolicy::from_millis(0), LockReleasePolicy::Immediate);
        assert_eq!(
            LockReleasePolicy::from_millis(5),
            LockReleasePolicy::Delayed(Duration::from_millis(5))
        );
        assert_eq!(LockReleasePolicy::default(), LockReleasePolicy::from_millis(5));
    }

    #[tokio::test]
    async fn immediate_release_frees_the_lock() {
        let lock = Arc::new(Mutex::new(0u32));
        let guard = Arc::clone(&lock).lock_owned().await;
        LockReleasePolicy::Immediate.release(guard);
        assert!(lock.try_lock().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_release_holds_the_lock_for_the_delay() {
        let lock = Arc::new(Mutex::new(0u32));
        let guard = Arc::clone(&lock).lock_owned().await;
        LockReleasePolicy::Delayed(Duration::from_millis(5)).release(guard);

        assert!(lock.try_lock().is_err());
        tokio::time::sleep(Duration::from_millis(4)).await;
        assert!(lock.try_lock().is_err());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(lock.try_lock().is_ok());
    }
}
