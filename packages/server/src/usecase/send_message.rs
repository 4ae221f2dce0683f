//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 永続化してからブロードキャストする順序
//!
//! ### なぜこのテストが必要か
//! - 永続化に成功したメッセージだけがルームに配信されることを保証
//! - 永続化リクエストに送信者とルームが正しく設定されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：永続化とブロードキャスト（送信者自身にも届く）
//! - 異常系：永続化の失敗（誰にも配信されない）

use std::sync::Arc;

use crate::{
    domain::{ChatId, ChatMessage, ChatRepository, CreateChatRequest, MessageContent, Timestamp, UserId},
    hub::{BroadcastOutcome, Room},
    infrastructure::dto::websocket::ServerFrame,
};

use super::error::SendMessageError;

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub message: ChatMessage,
    pub outcome: BroadcastOutcome,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room` - 送信先のルーム
    /// * `user_id` - 接続に紐づいた送信者の ID
    /// * `content` - メッセージ内容（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(SentMessage)` - 永続化された ID とブロードキャスト結果
    /// * `Err(SendMessageError)` - 永続化失敗（ブロードキャストは行われない）
    pub async fn execute(
        &self,
        room: &Room,
        user_id: &UserId,
        content: MessageContent,
    ) -> Result<SentMessage, SendMessageError> {
        // 1. Repository 経由でメッセージを永続化
        let request = CreateChatRequest {
            content: content.clone(),
            user_id: user_id.clone(),
            room_id: room.id().clone(),
        };
        let chat_id = self.repository.create_chat(request).await?;
        tracing::info!(
            chat_id = %chat_id,
            room_id = %room.id(),
            user_id = %user_id,
            "chat created"
        );

        // 2. ルームの全メンバーにブロードキャスト
        let message = ChatMessage::new(user_id.clone(), content, Timestamp::now());
        let outcome = room.broadcast(&ServerFrame::chat(&message)).await;

        Ok(SentMessage {
            chat_id,
            message,
            outcome,
        })
    }
}
