//! UseCase: ユーザー登録とログイン
//!
//! どちらも成功すると新しいセッションを発行します。
//! パスワードのハッシュ化・検証は CPU を占有するため blocking スレッドで実行します。

use std::sync::Arc;

use crate::domain::{PasswordHash, RepositoryError, SessionId, UserRepository, ValueObjectError};

use super::error::AccountError;

/// 登録・ログインのユースケース
pub struct AccountUseCase {
    repository: Arc<dyn UserRepository>,
}

impl AccountUseCase {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// ユーザーを登録し、セッションを発行する
    ///
    /// # Returns
    ///
    /// * `Ok(SessionId)` - 発行したセッション ID
    /// * `Err(AccountError)` - 入力不正、username 重複など
    pub async fn register(
        &self,
        name: String,
        username: String,
        password: String,
    ) -> Result<SessionId, AccountError> {
        if username.trim().is_empty() {
            return Err(ValueObjectError::UsernameEmpty.into());
        }

        let password_hash = hash_password(password).await?;
        let user = self
            .repository
            .create_user(name, username, password_hash)
            .await?;
        let session_id = self.repository.create_session(&user.id).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");

        Ok(session_id)
    }

    /// username とパスワードで認証し、新しいセッションを発行する
    pub async fn login(&self, username: String, password: String) -> Result<SessionId, AccountError> {
        let (user, password_hash) = match self.repository.get_credentials(&username).await {
            Ok(credentials) => credentials,
            Err(RepositoryError::UserNotFound(_)) => {
                tracing::debug!(username = %username, "login for unknown user");
                return Err(AccountError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !verify_password(password_hash, password).await? {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        let session_id = self.repository.create_session(&user.id).await?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok(session_id)
    }
}

async fn hash_password(password: String) -> Result<PasswordHash, AccountError> {
    let hash = tokio::task::spawn_blocking(move || PasswordHash::generate(&password))
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))??;
    Ok(hash)
}

async fn verify_password(hash: PasswordHash, password: String) -> Result<bool, AccountError> {
    tokio::task::spawn_blocking(move || hash.verify(&password))
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))
}
