//! 복제 경매 서비스
//!
//! 고정된 레플리카 서버들이 각자 같은 경매 상태 기계를 돌린다. 클라이언트는 모든 레플리카에
//! 명령을 브로드캐스트하고 첫 번째 성공 응답을 답으로 쓴다. 합의 프로토콜은 없다.
pub mod auction;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod replica;
