//! 値オブジェクト
//!
//! ID は全て UUID v4 の文字列表現を保持する。永続化 JSON では素の文字列として
//! 読み書きされるため、`#[serde(transparent)]` を付与している。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

/// Define a string-backed identifier with validation and UUID generation.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// 空文字列でなければ ID を作成
            pub fn new(value: String) -> Result<Self, ValidationError> {
                if value.trim().is_empty() {
                    return Err(ValidationError::Empty($label));
                }
                Ok(Self(value))
            }

            /// 新しい UUID v4 から ID を生成
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Room の識別子
    RoomId,
    "room id"
);
string_id!(
    /// Agent の識別子（Room 内で一意）
    AgentId,
    "agent id"
);
string_id!(
    /// Message の識別子
    MessageId,
    "message id"
);
string_id!(
    /// シミュレーションのセッション識別子
    ///
    /// サーバープロセスごとに 1 つ発行され、メッセージに刻印される。
    SessionId,
    "session id"
);

/// Room のタイトル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTitle(String);

impl RoomTitle {
    pub const MAX_CHARS: usize = 100;

    /// 前後の空白を除去し、空でなく最大長以内であれば作成
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty("room title"));
        }
        let chars = trimmed.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: "room title",
                max: Self::MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// タイピング速度（文字/秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingSpeed(u32);

impl TypingSpeed {
    pub const DEFAULT: TypingSpeed = TypingSpeed(30);

    pub fn new(chars_per_second: u32) -> Result<Self, ValidationError> {
        if chars_per_second == 0 {
            return Err(ValidationError::ZeroTypingSpeed);
        }
        Ok(Self(chars_per_second))
    }

    pub fn chars_per_second(self) -> u32 {
        self.0
    }
}

impl Default for TypingSpeed {
    fn default() -> Self {
        Self::DEFAULT
    }
}
