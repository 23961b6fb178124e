use axum::extract::{Path, State};
use axum::Json;

use crate::api::format::{PersonDto, PersonRequest};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{AdminUser, ApiResponse, ApiResult, AuthUser};
use crate::requests::{CreatePerson, DeletePerson, GetAllPeople, GetPerson, Handler, UpdatePerson};

/// GET /api/people
pub async fn list(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Vec<PersonDto>> {
    let people = GetAllPeople.handle(&state.people).await?;
    Ok(ApiResponse::ok(people))
}

/// GET /api/people/:id
pub async fn show(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<PersonDto> {
    let person = GetPerson { id: checked_id(id)? }.handle(&state.people).await?;
    Ok(ApiResponse::ok(person))
}

/// POST /api/people
pub async fn create(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(request): Json<PersonRequest>,
) -> ApiResult<PersonDto> {
    tracing::debug!("{} creating person", user.subject);
    let person = CreatePerson { request }.handle(&state.people).await?;
    let location = format!("/api/people/{}", person.id);
    Ok(ApiResponse::created(person, location))
}

/// PUT /api/people/:id
pub async fn update(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<i64>,
    Json(request): Json<PersonRequest>,
) -> ApiResult<PersonDto> {
    tracing::debug!("{} updating person {}", user.subject, id);
    let person = UpdatePerson { id: checked_id(id)?, request }
        .handle(&state.people)
        .await?;
    Ok(ApiResponse::ok(person))
}

/// DELETE /api/people/:id
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    tracing::debug!("{} deleting person {}", user.subject, id);
    DeletePerson { id: checked_id(id)? }.handle(&state.people).await?;
    Ok(ApiResponse::no_content())
}

fn checked_id(id: i64) -> Result<i64, ApiError> {
    if id <= 0 {
        return Err(ApiError::bad_request(format!("invalid person id: {}", id)));
    }
    Ok(id)
}
