//! HTTP API endpoint handlers.
//!
//! Membership endpoints answer `200` with `result: false` instead of an error
//! status when the request cannot be honoured.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use sketchroom_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::{RoomId, RoundDetail, UserEntry, UserId},
    infrastructure::dto::http::{
        CreateRoomRequest, JoinRoomRequest, MemberQuery, MembershipDto, RandomTopicDto, RoomDto,
        RoomQuery, RoundDetailDto, TopicListDto, UserDto,
    },
    ui::state::AppState,
    usecase::{
        CreateRoomUseCase, JoinRoomUseCase, Membership, QuitRoomUseCase, RoomQueryUseCase,
        RoomSnapshot, StartRoundUseCase,
    },
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `POST /room/create`
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Json<RoomDto> {
    let Ok(Json(request)) = payload else {
        tracing::warn!("Rejected create room request with malformed body");
        return Json(RoomDto::rejected());
    };

    let usecase = CreateRoomUseCase::new(state.repository.clone());
    match usecase.execute(request.room_name).await {
        Ok(room) => Json(RoomDto {
            room_id: room.id.as_str().to_string(),
            room_name: room.name.as_str().to_string(),
            users: Vec::new(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
            result: Some(true),
        }),
        Err(e) => {
            tracing::warn!("Failed to create room: {}", e);
            Json(RoomDto::rejected())
        }
    }
}

/// `POST /room/join`
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JoinRoomRequest>, JsonRejection>,
) -> Json<MembershipDto> {
    let Ok(Json(request)) = payload else {
        tracing::warn!("Rejected join request with malformed body");
        return Json(MembershipDto::rejected());
    };
    let Ok(room_id) = RoomId::new(request.room_id) else {
        return Json(MembershipDto::rejected());
    };

    let usecase = JoinRoomUseCase::new(state.repository.clone());
    match usecase
        .execute(&room_id, request.user_name, request.role)
        .await
    {
        Ok(membership) => Json(membership_dto(membership)),
        Err(e) => {
            tracing::warn!("Failed to join room '{}': {}", room_id, e);
            Json(MembershipDto::rejected())
        }
    }
}

/// `GET|POST /room/quit?roomId=..&userId=..`
pub async fn quit_room(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MemberQuery>,
) -> Json<MembershipDto> {
    let (Ok(room_id), Ok(user_id)) = (RoomId::new(query.room_id), UserId::new(query.user_id))
    else {
        return Json(MembershipDto::rejected());
    };

    let usecase = QuitRoomUseCase::new(state.repository.clone());
    match usecase.execute(&room_id, &user_id).await {
        Ok(membership) => Json(membership_dto(membership)),
        Err(e) => {
            tracing::warn!("Failed to quit room '{}': {}", room_id, e);
            Json(MembershipDto::rejected())
        }
    }
}

/// `GET|POST /room/startDraw?roomId=..`
pub async fn start_draw(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomQuery>,
) -> Json<RoundDetailDto> {
    let Ok(room_id) = RoomId::new(query.room_id) else {
        return Json(RoundDetailDto::rejected());
    };

    let usecase = StartRoundUseCase::new(state.repository.clone(), state.topics.clone());
    match usecase.execute(&room_id).await {
        Ok(round) => Json(round_dto(round)),
        Err(e) => {
            tracing::warn!("Failed to start round in '{}': {}", room_id, e);
            Json(RoundDetailDto::rejected())
        }
    }
}

/// `GET /room/topic?roomId=..`
pub async fn room_topic(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomQuery>,
) -> Json<RoundDetailDto> {
    let Ok(room_id) = RoomId::new(query.room_id) else {
        return Json(RoundDetailDto::rejected());
    };

    let usecase = RoomQueryUseCase::new(state.repository.clone());
    match usecase.current_round(&room_id).await {
        Some(round) => Json(round_dto(round)),
        None => Json(RoundDetailDto::rejected()),
    }
}

/// `GET /room/list`
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomDto>> {
    let usecase = RoomQueryUseCase::new(state.repository.clone());
    let rooms = usecase
        .list_rooms()
        .await
        .into_iter()
        .map(|snapshot| room_dto(snapshot, None))
        .collect();
    Json(rooms)
}

/// `GET /room/users?roomId=..`
pub async fn room_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomQuery>,
) -> Json<RoomDto> {
    let Ok(room_id) = RoomId::new(query.room_id) else {
        return Json(RoomDto::rejected());
    };

    let usecase = RoomQueryUseCase::new(state.repository.clone());
    match usecase.room_members(&room_id).await {
        Some(snapshot) => Json(room_dto(snapshot, Some(true))),
        None => Json(RoomDto::rejected()),
    }
}

/// `GET /topic/list`
pub async fn list_topics(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, TopicListDto>> {
    let topics = state
        .topics
        .categories()
        .into_iter()
        .map(|(category, topics)| (category, TopicListDto { topics }))
        .collect();
    Json(topics)
}

/// `GET /topic/random`
pub async fn random_topic(State(state): State<Arc<AppState>>) -> Json<RandomTopicDto> {
    let pick = state.topics.random_topic().unwrap_or_default();
    Json(RandomTopicDto {
        category: pick.category,
        topic: pick.topic,
    })
}

fn membership_dto(membership: Membership) -> MembershipDto {
    MembershipDto {
        user_id: membership.user_id.into_string(),
        user_name: membership.user_name,
        room_id: membership.room_id.into_string(),
        room_name: membership.room_name,
        role: membership.role,
        result: true,
    }
}

fn round_dto(round: RoundDetail) -> RoundDetailDto {
    RoundDetailDto {
        category: round.category,
        topic: round.topic,
        current_draw_user_id: round.current_draw_user_id,
        next_draw_user_id: round.next_draw_user_id,
        result: true,
    }
}

fn room_dto(snapshot: RoomSnapshot, result: Option<bool>) -> RoomDto {
    RoomDto {
        room_id: snapshot.id.into_string(),
        room_name: snapshot.name.as_str().to_string(),
        users: snapshot.members.iter().map(user_dto).collect(),
        created_at: timestamp_to_jst_rfc3339(snapshot.created_at.value()),
        result,
    }
}

fn user_dto(entry: &UserEntry) -> UserDto {
    UserDto {
        room_id: entry.room_id.as_str().to_string(),
        user_id: entry.user_id.as_str().to_string(),
        user_name: entry.user_name.as_str().to_string(),
        role: entry.role.clone(),
        ready: entry.ready,
        joined_at: timestamp_to_jst_rfc3339(entry.joined_at.value()),
    }
}
