//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{AgentId, RoomId},
    infrastructure::dto::http::{
        AddAgentRequest, AgentTypeDto, CreateRoomRequest, CreatedDto, ErrorDto, RoomDetailDto,
        RoomSummaryDto, SimulationStatusDto, TypingSpeedDto, UpdateRoomRequest,
    },
    ui::state::AppState,
    usecase::{AgentUseCaseError, RoomUseCaseError, SimulationError},
};

/// Error response: status code plus `{"error": "..."}` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn room_not_found(room_id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("room '{}' not found", room_id))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.message);
        } else {
            tracing::debug!("Request rejected ({}): {}", self.status, self.message);
        }
        (
            self.status,
            Json(ErrorDto {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<RoomUseCaseError> for ApiError {
    fn from(error: RoomUseCaseError) -> Self {
        let status = match &error {
            RoomUseCaseError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            RoomUseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
            RoomUseCaseError::Room(_) => StatusCode::CONFLICT,
        };
        Self::new(status, error.to_string())
    }
}

impl From<AgentUseCaseError> for ApiError {
    fn from(error: AgentUseCaseError) -> Self {
        let status = match &error {
            AgentUseCaseError::RoomNotFound(_) | AgentUseCaseError::AgentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AgentUseCaseError::UnknownAgentType(_) | AgentUseCaseError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AgentUseCaseError::Room(_) => StatusCode::CONFLICT,
        };
        Self::new(status, error.to_string())
    }
}

impl From<SimulationError> for ApiError {
    fn from(error: SimulationError) -> Self {
        let status = match &error {
            SimulationError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            SimulationError::NotEnoughAgents(_) => StatusCode::CONFLICT,
            SimulationError::InvalidTypingSpeed => StatusCode::BAD_REQUEST,
        };
        Self::new(status, error.to_string())
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn parse_room_id(room_id: String) -> ApiResult<RoomId> {
    RoomId::new(room_id.clone()).map_err(|_| ApiError::room_not_found(&room_id))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Agent catalog
pub async fn get_agent_types(State(state): State<Arc<AppState>>) -> Json<Vec<AgentTypeDto>> {
    let agent_types = state.get_agent_types_usecase.execute();
    Json(agent_types.into_iter().map(AgentTypeDto::from).collect())
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let summaries = rooms
        .iter()
        .map(|view| RoomSummaryDto::from_room(&view.room, view.active))
        .collect();

    Json(summaries)
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> ApiResult<(StatusCode, Json<CreatedDto>)> {
    let room_id = state
        .create_room_usecase
        .execute(request.title, request.room_type)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedDto {
            id: room_id.into_string(),
        }),
    ))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> ApiResult<Json<RoomDetailDto>> {
    let room_id = parse_room_id(room_id)?;
    let view = state.get_room_detail_usecase.execute(&room_id).await?;
    Ok(Json(RoomDetailDto::from_room(&view.room, view.active)))
}

pub async fn update_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(request): Json<UpdateRoomRequest>,
) -> ApiResult<Json<RoomDetailDto>> {
    let room_id = parse_room_id(room_id)?;
    let room = state
        .update_room_usecase
        .execute(&room_id, request.title, request.room_type)
        .await?;
    let active = state
        .get_simulation_status_usecase
        .execute(&room_id)
        .await
        .unwrap_or(false);
    Ok(Json(RoomDetailDto::from_room(&room, active)))
}

/// Idempotent: deleting a missing room also answers 204
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> StatusCode {
    if let Ok(room_id) = RoomId::new(room_id) {
        state.delete_room_usecase.execute(&room_id).await;
    }
    StatusCode::NO_CONTENT
}

pub async fn add_agent(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(request): Json<AddAgentRequest>,
) -> ApiResult<(StatusCode, Json<CreatedDto>)> {
    let room_id = parse_room_id(room_id)?;
    let agent = state
        .add_agent_usecase
        .execute(&room_id, &request.agent_type)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedDto {
            id: agent.id.into_string(),
        }),
    ))
}

pub async fn remove_agent(
    State(state): State<Arc<AppState>>,
    Path((room_id, agent_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let agent_id = AgentId::new(agent_id.clone()).map_err(|_| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            format!("agent '{}' not found", agent_id),
        )
    })?;
    state
        .remove_agent_usecase
        .execute(&room_id, &agent_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn start_simulation(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> ApiResult<Json<SimulationStatusDto>> {
    let room_id = parse_room_id(room_id)?;
    state.start_simulation_usecase.execute(&room_id).await?;
    Ok(Json(SimulationStatusDto {
        room_id: room_id.into_string(),
        active: true,
    }))
}

pub async fn pause_simulation(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> ApiResult<Json<SimulationStatusDto>> {
    let room_id = parse_room_id(room_id)?;
    state.pause_simulation_usecase.execute(&room_id).await?;
    Ok(Json(SimulationStatusDto {
        room_id: room_id.into_string(),
        active: false,
    }))
}

pub async fn get_simulation_status(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> ApiResult<Json<SimulationStatusDto>> {
    let room_id = parse_room_id(room_id)?;
    let active = state.get_simulation_status_usecase.execute(&room_id).await?;
    Ok(Json(SimulationStatusDto {
        room_id: room_id.into_string(),
        active,
    }))
}

pub async fn get_typing_speed(State(state): State<Arc<AppState>>) -> Json<TypingSpeedDto> {
    Json(TypingSpeedDto {
        chars_per_second: state.set_typing_speed_usecase.current().chars_per_second(),
    })
}

pub async fn set_typing_speed(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TypingSpeedDto>,
) -> ApiResult<Json<TypingSpeedDto>> {
    let speed = state
        .set_typing_speed_usecase
        .execute(request.chars_per_second)?;
    Ok(Json(TypingSpeedDto {
        chars_per_second: speed.chars_per_second(),
    }))
}
