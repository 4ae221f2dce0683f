//! InMemory User Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    PasswordHash, RepositoryError, Session, SessionId, Timestamp, User, UserIdFactory, UserId,
    UserRepository,
};

struct UserRecord {
    user: User,
    password_hash: PasswordHash,
}

struct SessionRecord {
    user_id: UserId,
    created_at: Timestamp,
}

/// インメモリ User Repository 実装
///
/// ユーザー（パスワードハッシュ付き）とセッションを HashMap で保持します。
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, UserRecord>>,
    sessions: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count_users(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(
        &self,
        name: String,
        username: String,
        password_hash: PasswordHash,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().await;
        if users.values().any(|r| r.user.username == username) {
            return Err(RepositoryError::DuplicateUsername(username));
        }

        let id = UserIdFactory::generate()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        let user = User::new(id.clone(), name, username, Timestamp::now());
        users.insert(
            id,
            UserRecord {
                user: user.clone(),
                password_hash,
            },
        );

        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, RepositoryError> {
        let users = self.users.lock().await;
        users
            .get(id)
            .map(|r| r.user.clone())
            .ok_or_else(|| RepositoryError::UserNotFound(id.to_string()))
    }

    async fn get_credentials(&self, username: &str) -> Result<(User, PasswordHash), RepositoryError> {
        let users = self.users.lock().await;
        users
            .values()
            .find(|r| r.user.username == username)
            .map(|r| (r.user.clone(), r.password_hash.clone()))
            .ok_or_else(|| RepositoryError::UserNotFound(username.to_string()))
    }

    async fn create_session(&self, user_id: &UserId) -> Result<SessionId, RepositoryError> {
        // Sessions must point at a registered user
        self.get_user(user_id).await?;

        let id = SessionId::generate();
        let mut sessions = self.sessions.lock().await;
        sessions.insert(
            id,
            SessionRecord {
                user_id: user_id.clone(),
                created_at: Timestamp::now(),
            },
        );

        Ok(id)
    }

    async fn get_session(&self, id: &SessionId) -> Result<Session, RepositoryError> {
        let (user_id, created_at) = {
            let sessions = self.sessions.lock().await;
            let record = sessions
                .get(id)
                .ok_or_else(|| RepositoryError::SessionNotFound(id.to_string()))?;
            (record.user_id.clone(), record.created_at)
        };

        let user = self.get_user(&user_id).await?;

        Ok(Session {
            id: *id,
            user,
            created_at,
        })
    }
}
