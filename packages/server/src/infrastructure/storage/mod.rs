//! `KeyValueStorage` の実装
//!
//! - `json_file`: キーごとに `<dir>/<key>.json` へ書き出すファイル実装
//! - `inmemory`: テストやお試し用のメモリ実装

pub mod inmemory;
pub mod json_file;

pub use inmemory::InMemoryStorage;
pub use json_file::JsonFileStorage;
