//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{
    add_agent, create_room, delete_room, get_agent_types, get_room_detail, get_rooms,
    get_simulation_status, get_typing_speed, health_check, pause_simulation, remove_agent,
    set_typing_speed, start_simulation, update_room,
};
pub use websocket::websocket_handler;
