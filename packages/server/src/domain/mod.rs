//! ドメイン層
//!
//! エンティティ・値オブジェクト・エージェントカタログ・メッセージ生成と、
//! Infrastructure 層が実装する trait（Repository, Storage, EventPublisher）を定義します。

pub mod agent_catalog;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_generator;
pub mod repository;
pub mod storage;
pub mod value_object;

pub use agent_catalog::{AgentType, AgentTypeInfo};
pub use entity::{
    Agent, AgentStatus, DEFAULT_ROOM_TITLE, DEFAULT_ROOM_TYPE, MIN_AGENTS_FOR_SIMULATION, Message,
    Room,
};
pub use error::{RepositoryError, RoomError, StorageError, ValidationError};
pub use event::{RoomEvent, RoomEventPublisher};
pub use message_generator::{MessageGenerator, TemplateMessageGenerator};
pub use repository::{NewRoom, RoomRepository, RoomUpdate};
pub use storage::{KeyValueStorage, ROOMS_STORAGE_KEY};
pub use value_object::{AgentId, MessageId, RoomId, RoomTitle, SessionId, TypingSpeed};

#[cfg(test)]
pub use event::MockRoomEventPublisher;
