//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{
    create_room, health_check, join_room, list_rooms, list_topics, quit_room, random_topic,
    room_topic, room_users, start_draw,
};

// Re-export WebSocket handlers
pub use websocket::{draw_ws_handler, room_ws_handler};
