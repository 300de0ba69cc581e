//! 永続化ストレージの抽象化
//!
//! ブラウザの localStorage と同じく、文字列キーに文字列値を丸ごと保存する
//! だけの単純なキー・バリューストア。

use async_trait::async_trait;

use super::StorageError;

/// Room 一覧を保存するキー
pub const ROOMS_STORAGE_KEY: &str = "investmentRooms";

#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// 値を取得（未保存なら `None`）
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 値を丸ごと上書き保存
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
}
