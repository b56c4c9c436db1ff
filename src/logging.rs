//! 로깅 초기화
//!
//! 표준 출력과 (설정된 경우) 로그 파일에 같이 쓴다. 레플리카는 포트를 잡은 뒤에야
//! 파일 이름이 정해지므로, 파일은 구독자 초기화 후에 `LogFile::attach` 로 붙인다.
// region:    --- Imports
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

// endregion: --- Imports

// region:    --- Log File
/// 나중에 붙일 수 있는 로그 파일 출력. 붙기 전에는 아무것도 쓰지 않는다.
#[derive(Clone, Default)]
pub struct LogFile(Arc<Mutex<Option<File>>>);

impl LogFile {
    /// 파일을 비우고 (없으면 만들고) 이후 로그를 이어 쓴다
    pub fn attach(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        *self.slot()? = Some(file);
        Ok(())
    }

    fn slot(&self) -> io::Result<MutexGuard<'_, Option<File>>> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut slot = self.slot()?;
        if let Some(file) = slot.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut slot = self.slot()?;
        match slot.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}
// endregion: --- Log File

// region:    --- Init
/// 전역 구독자 설정. `RUST_LOG` 가 없으면 `info`.
pub fn init() -> Result<LogFile, TryInitError> {
    let log_file = LogFile::default();
    let file_writer = log_file.clone();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(move || file_writer.clone()),
        )
        .try_init()?;

    Ok(log_file)
}
// endregion: --- Init

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn detached_log_file_swallows_output() {
        let mut log_file = LogFile::default();
        assert_eq!(log_file.write(b"dropped").unwrap(), 7);
        log_file.flush().unwrap();
    }

    #[test]
    fn poisoned_lock_is_an_io_error() {
        let mut log_file = LogFile::default();
        let inner = Arc::clone(&log_file.0);
        let _ = std::thread::spawn(move || {
            let _guard = inner.lock().unwrap();
            panic!("poison");
        })
        .join();

        let err = log_file.write(b"lost").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(log_file.flush().is_err());
    }

    #[test]
    fn attach_truncates_and_appends() {
        let path = std::env::temp_dir().join(format!("auction-log-{}.txt", std::process::id()));
        std::fs::write(&path, "stale contents\n").unwrap();

        let mut log_file = LogFile::default();
        log_file.attach(&path).unwrap();
        log_file.write_all(b"first\n").unwrap();
        log_file.clone().write_all(b"second\n").unwrap();
        log_file.flush().unwrap();

        let mut contents = String::new();
        File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "first\nsecond\n");
        std::fs::remove_file(&path).unwrap();
    }
}
