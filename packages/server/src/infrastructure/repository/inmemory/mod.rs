pub mod room;

pub use room::{INITIAL_ROOM_TITLE, InMemoryRoomRepository};
