//! InMemory Repository 実装
//!
//! プロセス内の HashMap / Vec をストレージとして使用します。
//! プロセス終了とともにデータは失われます。

mod chat;
mod user;

pub use chat::InMemoryChatRepository;
pub use user::InMemoryUserRepository;
