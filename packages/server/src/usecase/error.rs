//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// メッセージ送信時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// 永続化に失敗した（メッセージは破棄され、ブロードキャストされない）
    #[error("failed to save message: {0}")]
    Persistence(#[from] RepositoryError),
}

/// 登録・ログイン時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// ユーザーが存在しない、またはパスワードが一致しない（どちらかは区別しない）
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}
