//! Room membership and fan-out.

use std::collections::HashMap;

use tokio::sync::Mutex;

use super::connection::Connection;
use crate::{
    domain::{ConnectionId, RoomId, Timestamp, User},
    infrastructure::dto::websocket::ServerFrame,
};

struct Member {
    connection: Connection,
    user: User,
}

/// Result of one [`Room::broadcast`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Connections the frame was queued for
    pub delivered: usize,
    /// Connections whose send failed and that were removed from the room
    pub pruned: Vec<ConnectionId>,
}

/// A named group of connections sharing one broadcast scope.
///
/// `join`, `leave` and `broadcast` all take the same lock, so a broadcast
/// sees exactly the members registered when it acquired it.
pub struct Room {
    id: RoomId,
    name: String,
    created_at: Timestamp,
    members: Mutex<HashMap<ConnectionId, Member>>,
}

impl Room {
    /// Create an empty room named after its identifier.
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            name: id.to_string(),
            id,
            created_at,
            members: Mutex::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Register `connection` as occupied by `user`.
    ///
    /// Joining again with the same connection replaces the stored user.
    pub async fn join(&self, connection: Connection, user: User) {
        let connection_id = connection.id();
        let user_id = user.id.clone();

        let mut members = self.members.lock().await;
        let previous = members.insert(connection_id, Member { connection, user });

        tracing::info!(
            room_id = %self.id,
            connection_id = %connection_id,
            user_id = %user_id,
            rejoined = previous.is_some(),
            members = members.len(),
            "connection joined room"
        );
    }

    /// Remove a connection. Returns `false` if it was not a member.
    pub async fn leave(&self, connection_id: &ConnectionId) -> bool {
        let mut members = self.members.lock().await;
        let removed = members.remove(connection_id).is_some();

        if removed {
            tracing::info!(
                room_id = %self.id,
                connection_id = %connection_id,
                members = members.len(),
                "connection left room"
            );
        }
        removed
    }

    /// Send `frame` to every member, the sender included.
    ///
    /// A failed send never stops delivery to the others; the failing
    /// connection is dropped from the room before the lock is released.
    pub async fn broadcast(&self, frame: &ServerFrame) -> BroadcastOutcome {
        let mut members = self.members.lock().await;
        let mut outcome = BroadcastOutcome::default();

        for (connection_id, member) in members.iter() {
            match member.connection.send(frame.clone()) {
                Ok(()) => outcome.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        room_id = %self.id,
                        connection_id = %connection_id,
                        user_id = %member.user.id,
                        error = %e,
                        "broadcast failed, removing connection"
                    );
                    outcome.pruned.push(*connection_id);
                }
            }
        }

        for connection_id in &outcome.pruned {
            members.remove(connection_id);
        }

        tracing::debug!(
            room_id = %self.id,
            delivered = outcome.delivered,
            pruned = outcome.pruned.len(),
            "broadcast finished"
        );
        outcome
    }

    /// Users of the current members, one entry per connection, sorted by user id.
    pub async fn members(&self) -> Vec<User> {
        let members = self.members.lock().await;
        let mut users: Vec<User> = members.values().map(|m| m.user.clone()).collect();
        users.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        users
    }

    pub async fn member_count(&self) -> usize {
        self.members.lock().await.len()
    }

    pub async fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.lock().await.contains_key(connection_id)
    }

    /// User bound to a connection, if it is a member.
    pub async fn user_of(&self, connection_id: &ConnectionId) -> Option<User> {
        let members = self.members.lock().await;
        members.get(connection_id).map(|m| m.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;
    use crate::domain::UserId;

    fn user(id: &str) -> User {
        User::new(
            UserId::new(id.to_string()).unwrap(),
            id.to_uppercase(),
            id.to_string(),
            Timestamp::new(0),
        )
    }

    fn lobby() -> Room {
        Room::new(RoomId::new("lobby".to_string()).unwrap(), Timestamp::new(0))
    }

    #[tokio::test]
    async fn test_room_new() {
        // テスト項目: 新しい Room が空の状態で作成され、名前は ID と同じ
        let room = lobby();

        assert_eq!(room.id().as_str(), "lobby");
        assert_eq!(room.name(), "lobby");
        assert_eq!(room.created_at(), Timestamp::new(0));
        assert_eq!(room.member_count().await, 0);
    }

    #[tokio::test]
    async fn test_join_registers_member() {
        // テスト項目: join した接続がメンバーとして登録される
        // given (前提条件):
        let room = lobby();
        let (connection, _rx) = Connection::channel();

        // when (操作):
        room.join(connection.clone(), user("alice")).await;

        // then (期待する結果):
        assert!(room.contains(&connection.id()).await);
        assert_eq!(room.members().await, vec![user("alice")]);
    }

    #[tokio::test]
    async fn test_rejoin_overwrites_user() {
        // テスト項目: 同じ接続で再度 join するとユーザーが上書きされる
        // given (前提条件):
        let room = lobby();
        let (connection, _rx) = Connection::channel();
        room.join(connection.clone(), user("alice")).await;

        // when (操作):
        room.join(connection.clone(), user("bob")).await;

        // then (期待する結果):
        assert_eq!(room.member_count().await, 1);
        assert_eq!(room.user_of(&connection.id()).await, Some(user("bob")));
    }

    #[tokio::test]
    async fn test_leave_is_idempotent() {
        // テスト項目: leave は二回目以降 no-op になる
        // given (前提条件):
        let room = lobby();
        let (connection, _rx) = Connection::channel();
        room.join(connection.clone(), user("alice")).await;

        // when (操作):
        let first = room.leave(&connection.id()).await;
        let second = room.leave(&connection.id()).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(room.member_count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_member_including_sender() {
        // テスト項目: ブロードキャストは送信者を含む全メンバーに届く
        // given (前提条件):
        let room = lobby();
        let (alice, mut alice_rx) = Connection::channel();
        let (bob, mut bob_rx) = Connection::channel();
        room.join(alice, user("alice")).await;
        room.join(bob, user("bob")).await;

        // when (操作):
        let outcome = room.broadcast(&ServerFrame::error("ping")).await;

        // then (期待する結果):
        assert_eq!(outcome.delivered, 2);
        assert!(outcome.pruned.is_empty());
        assert_eq!(alice_rx.recv().await, Some(ServerFrame::error("ping")));
        assert_eq!(bob_rx.recv().await, Some(ServerFrame::error("ping")));
    }

    #[tokio::test]
    async fn test_broadcast_skips_members_that_left() {
        // テスト項目: leave 済みの接続にはブロードキャストされない
        // given (前提条件):
        let room = lobby();
        let (alice, mut alice_rx) = Connection::channel();
        let (bob, mut bob_rx) = Connection::channel();
        room.join(alice, user("alice")).await;
        room.join(bob.clone(), user("bob")).await;
        room.leave(&bob.id()).await;

        // when (操作):
        let outcome = room.broadcast(&ServerFrame::error("ping")).await;

        // then (期待する結果):
        assert_eq!(outcome.delivered, 1);
        assert_eq!(alice_rx.recv().await, Some(ServerFrame::error("ping")));
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_prunes_failed_connection() {
        // テスト項目: 送信に失敗した接続は削除され、他のメンバーへの配信は継続される
        // given (前提条件): carol の受信側は既に閉じている
        let room = lobby();
        let (alice, mut alice_rx) = Connection::channel();
        let (bob, mut bob_rx) = Connection::channel();
        let (carol, carol_rx) = Connection::channel();
        room.join(alice, user("alice")).await;
        room.join(carol.clone(), user("carol")).await;
        room.join(bob, user("bob")).await;
        drop(carol_rx);

        // when (操作):
        let outcome = room.broadcast(&ServerFrame::error("ping")).await;

        // then (期待する結果):
        assert_eq!(outcome.delivered, 2);
        assert_eq!(outcome.pruned, vec![carol.id()]);
        assert!(!room.contains(&carol.id()).await);
        assert_eq!(room.member_count().await, 2);
        assert_eq!(alice_rx.recv().await, Some(ServerFrame::error("ping")));
        assert_eq!(bob_rx.recv().await, Some(ServerFrame::error("ping")));
    }

    #[tokio::test]
    async fn test_broadcast_empty_room() {
        let outcome = lobby().broadcast(&ServerFrame::error("ping")).await;

        assert_eq!(outcome, BroadcastOutcome::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_join_and_leave() {
        // テスト項目: 複数タスクからの join / leave の結果が直列化した結果と一致する
        // given (前提条件):
        let room = Arc::new(lobby());
        let connections: Vec<_> = (0..64).map(|_| Connection::channel()).collect();

        // when (操作): 全員が join し、偶数番目だけが leave する
        let mut handles = Vec::new();
        for (i, (connection, _rx)) in connections.iter().enumerate() {
            let room = room.clone();
            let connection = connection.clone();
            handles.push(tokio::spawn(async move {
                room.join(connection.clone(), user(&format!("user{i}"))).await;
                tokio::task::yield_now().await;
                if i % 2 == 0 {
                    room.leave(&connection.id()).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果): 奇数番目の接続だけが残る
        let expected: HashSet<ConnectionId> = connections
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 1)
            .map(|(_, (c, _))| c.id())
            .collect();
        assert_eq!(room.member_count().await, expected.len());
        for id in &expected {
            assert!(room.contains(id).await);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_broadcast_concurrent_with_joins() {
        // テスト項目: join と並行したブロードキャストでも各メンバーへの配信は高々 1 回
        // given (前提条件):
        let room = Arc::new(lobby());
        let (alice, mut alice_rx) = Connection::channel();
        room.join(alice, user("alice")).await;

        // when (操作):
        let joiner = {
            let room = room.clone();
            tokio::spawn(async move {
                let mut receivers = Vec::new();
                for i in 0..32 {
                    let (c, rx) = Connection::channel();
                    room.join(c, user(&format!("user{i}"))).await;
                    receivers.push(rx);
                }
                receivers
            })
        };
        let outcome = room.broadcast(&ServerFrame::error("ping")).await;
        let mut receivers = joiner.await.unwrap();

        // then (期待する結果):
        let late_deliveries = receivers
            .iter_mut()
            .filter_map(|rx| rx.try_recv().ok())
            .count();
        assert_eq!(outcome.delivered, late_deliveries + 1);
        assert_eq!(alice_rx.recv().await, Some(ServerFrame::error("ping")));
        assert!(receivers.iter_mut().all(|rx| rx.try_recv().is_err()));
    }
}
