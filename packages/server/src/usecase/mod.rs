//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! Hub / UI から呼び出され、Domain 層と Repository を操作します。

pub mod account;
pub mod error;
pub mod send_message;

pub use account::AccountUseCase;
pub use error::{AccountError, SendMessageError};
pub use send_message::{SendMessageUseCase, SentMessage};
