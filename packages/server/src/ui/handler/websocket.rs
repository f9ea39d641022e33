//! WebSocket connection handlers.
//!
//! Each connection runs a receive task that feeds the hub and a send task
//! that drains the connection's outbox into the socket.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use futures_util::{sink::SinkExt, stream::StreamExt};

use crate::{
    domain::{ChannelKind, ConnectionChannel, Frame, RoomId, UserId},
    ui::state::{AppState, ConnectQuery},
    usecase::{AttachChannelUseCase, BroadcastHub, DetachChannelUseCase, HubError},
};

/// `GET /ws/room/{room_id}?userId=..`
pub async fn room_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<Response, StatusCode> {
    upgrade(ws, state, room_id, query.user_id, ChannelKind::Room).await
}

/// `GET /ws/draw/{room_id}?userId=..`
pub async fn draw_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<Response, StatusCode> {
    upgrade(ws, state, room_id, query.user_id, ChannelKind::Draw).await
}

async fn upgrade(
    ws: WebSocketUpgrade,
    state: Arc<AppState>,
    room_id: String,
    user_id: String,
    kind: ChannelKind,
) -> Result<Response, StatusCode> {
    let (Ok(room_id), Ok(user_id)) = (RoomId::try_from(room_id), UserId::try_from(user_id)) else {
        tracing::warn!("Refused {} connection with missing room or user id", kind);
        return Err(StatusCode::BAD_REQUEST);
    };

    let attach = AttachChannelUseCase::new(state.repository.clone());
    if let Err(e) = attach.ensure_member(&room_id, &user_id).await {
        tracing::warn!("Refused {} connection of '{}': {}", kind, user_id, e);
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, user_id, kind)))
}

async fn handle_socket(
    mut socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    user_id: UserId,
    kind: ChannelKind,
) {
    let (channel, mut outbox) = ConnectionChannel::open(kind);
    let connection_id = channel.id();

    // The member may have left between the pre-upgrade check and now
    let attach = AttachChannelUseCase::new(state.repository.clone());
    if let Err(e) = attach.execute(&room_id, &user_id, channel).await {
        tracing::warn!("Closing {} connection of '{}': {}", kind, user_id, e);
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    let (mut sender, mut receiver) = socket.split();

    // Spawn a task to drain this connection's outbox into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbox.next_frame().await {
            let closing = frame == Frame::Close;
            if sender.send(into_message(frame)).await.is_err() || closing {
                break;
            }
        }
    });

    // Spawn a task to receive frames from this client
    let hub = BroadcastHub::new(state.repository.clone());
    let recv_room_id = room_id.clone();
    let recv_user_id = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on {} channel of '{}': {}", kind, recv_user_id, e);
                    break;
                }
            };

            let result = match msg {
                Message::Ping(_) => {
                    // Pong is queued by the protocol layer on read
                    tracing::debug!("Received ping from '{}'", recv_user_id);
                    continue;
                }
                Message::Pong(_) => continue,
                Message::Close(_) => {
                    tracing::info!("Client '{}' closed its {} connection", recv_user_id, kind);
                    break;
                }
                Message::Text(text) => match kind {
                    ChannelKind::Draw => hub
                        .relay_drawing(&recv_room_id, &recv_user_id, Frame::Text(text.as_str().to_owned()))
                        .await
                        .map(|_| ()),
                    ChannelKind::Room => hub
                        .handle_room_text(&recv_room_id, &recv_user_id, text.as_str())
                        .await
                        .map(|_| ()),
                },
                Message::Binary(data) => match kind {
                    ChannelKind::Draw => hub
                        .relay_drawing(&recv_room_id, &recv_user_id, Frame::Binary(data.to_vec()))
                        .await
                        .map(|_| ()),
                    ChannelKind::Room => match std::str::from_utf8(&data) {
                        Ok(text) => hub
                            .handle_room_text(&recv_room_id, &recv_user_id, text)
                            .await
                            .map(|_| ()),
                        Err(e) => Err(HubError::MalformedFrame(e.to_string())),
                    },
                },
            };

            if let Err(e) = result {
                tracing::warn!(
                    "Ending {} connection of '{}' in '{}': {}",
                    kind,
                    recv_user_id,
                    recv_room_id,
                    e
                );
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let detach = DetachChannelUseCase::new(state.repository.clone());
    let outcome = detach
        .execute(&room_id, &user_id, kind, connection_id)
        .await;
    tracing::info!(
        "{} connection {} of '{}' finished: {:?}",
        kind,
        connection_id,
        user_id,
        outcome
    );
}

fn into_message(frame: Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(text.into()),
        Frame::Binary(data) => Message::Binary(data.into()),
        Frame::Close => Message::Close(None),
    }
}
