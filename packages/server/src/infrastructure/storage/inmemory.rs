//! InMemory KeyValueStorage 実装

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use crate::domain::{KeyValueStorage, StorageError};

/// HashMap に値を保持するだけのストレージ
///
/// プロセス終了で内容は失われる。スケジューラや Repository のテストで
/// ファイル I/O なしに永続化の呼び出しを観測するために使う。
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期値を持ったストレージを作成
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.insert(key, value.to_string());
        storage
    }

    fn insert(&self, key: &str, value: String) {
        let mut items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.insert(key.to_string(), value);
    }

    /// 保存済みの値を同期的に覗く（テスト用）
    pub fn peek(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.peek(key))
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.insert(key, value);
        Ok(())
    }
}
