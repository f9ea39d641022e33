//! Server startup: wiring, routing and the listen loop.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    infrastructure::{repository::InMemoryRoomRepository, topic::TopicCatalog},
    ui::{
        config::ServerArgs,
        handler::{
            create_room, draw_ws_handler, health_check, join_room, list_rooms, list_topics,
            quit_room, random_topic, room_topic, room_users, room_ws_handler, start_draw,
        },
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Build the router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/room/create", post(create_room))
        .route("/room/join", post(join_room))
        .route("/room/quit", get(quit_room).post(quit_room))
        .route("/room/startDraw", get(start_draw).post(start_draw))
        .route("/room/topic", get(room_topic))
        .route("/room/list", get(list_rooms))
        .route("/room/users", get(room_users))
        .route("/topic/list", get(list_topics))
        .route("/topic/random", get(random_topic))
        .route("/ws/room/{room_id}", get(room_ws_handler))
        .route("/ws/draw/{room_id}", get(draw_ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until a shutdown signal arrives.
///
/// Failing to bind is the only fatal error; an unreadable topics directory
/// only leaves the catalog empty.
pub async fn run(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let topics = TopicCatalog::load(&args.topics_dir).unwrap_or_else(|e| {
        tracing::warn!(
            "Topics unavailable from {}: {}; starting with an empty catalog",
            args.topics_dir.display(),
            e
        );
        TopicCatalog::empty()
    });
    if topics.is_empty() {
        tracing::warn!("No topics available; rounds will start without a topic");
    } else {
        tracing::info!("Serving topics from {} categories", topics.len());
    }

    let state = Arc::new(AppState::new(
        Arc::new(InMemoryRoomRepository::new()),
        Arc::new(topics),
    ));
    let app = build_router(state);

    let addr = args.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Sketchroom server listening on {}", listener.local_addr()?);
    tracing::info!("  Room channel:    ws://{}/ws/room/{{room_id}}?userId=...", addr);
    tracing::info!("  Drawing channel: ws://{}/ws/draw/{{room_id}}?userId=...", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
