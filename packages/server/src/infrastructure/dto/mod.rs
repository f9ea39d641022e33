//! Data transfer objects for the HTTP API and the room channel.

pub mod http;
pub mod websocket;
