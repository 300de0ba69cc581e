//! ファイルに JSON 文書を書き出す KeyValueStorage 実装
//!
//! キー `investmentRooms` は `<dir>/investmentRooms.json` に対応する。
//! 書き込みは一時ファイルへ書いてから rename するため、途中で中断しても
//! 既存のファイルが壊れることはない。

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;

use crate::domain::{KeyValueStorage, StorageError};

/// ディレクトリ配下にキーごとの JSON ファイルを置くストレージ
pub struct JsonFileStorage {
    dir: PathBuf,
    /// set_item が呼ばれた順番
    next_seq: AtomicU64,
    /// 最後にディスクへ書き出した set_item の順番
    ///
    /// ブロッキングスレッド上の書き込みは順不同で実行され得るため、
    /// 古いスナップショットが新しいものを上書きしないように使う。
    last_written: Arc<Mutex<u64>>,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_seq: AtomicU64::new(0),
            last_written: Arc::new(Mutex::new(0)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStorage for JsonFileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let last_written = Arc::clone(&self.last_written);

        tokio::task::spawn_blocking(move || write_if_newer(&path, &value, seq, &last_written))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

fn write_if_newer(
    path: &Path,
    value: &str,
    seq: u64,
    last_written: &Mutex<u64>,
) -> Result<(), StorageError> {
    let mut last = last_written
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if seq < *last {
        tracing::debug!(
            "Skipping stale write #{} to {} (#{} already written)",
            seq,
            path.display(),
            *last
        );
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, value)?;
    fs::rename(&tmp_path, path)?;
    *last = seq;

    Ok(())
}
