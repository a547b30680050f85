use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use itsm_application::{
    FIELD_REMOVE_FAILED_MESSAGE, FIELD_REMOVED_MESSAGE, FIELD_SAVE_FAILED_MESSAGE,
    FIELDS_LOAD_FAILED_MESSAGE, FIELDS_UPDATED_MESSAGE, UserNotice,
};
use itsm_core::{AccessToken, AppResult};
use itsm_domain::{EntityType, FieldDescriptor, FieldSetKey};

use crate::dto::{FieldSetResponse, ReplaceFieldsRequest, SaveFieldRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn list_fields_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(entity_type): Path<String>,
) -> ApiResult<Json<FieldSetResponse>> {
    let key = FieldSetKey::Entity(EntityType::from_str(entity_type.as_str())?);
    load_field_set(&state, &token, &key).await
}

pub async fn replace_fields_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(entity_type): Path<String>,
    Json(payload): Json<ReplaceFieldsRequest>,
) -> ApiResult<Json<FieldSetResponse>> {
    let key = FieldSetKey::Entity(EntityType::from_str(entity_type.as_str())?);
    replace_field_set(&state, &token, &key, payload).await
}

pub async fn save_field_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(entity_type): Path<String>,
    Json(payload): Json<SaveFieldRequest>,
) -> ApiResult<Json<FieldSetResponse>> {
    let key = FieldSetKey::Entity(EntityType::from_str(entity_type.as_str())?);
    let (input, editing_index) = payload.into_input()?;

    let current = state
        .schema_admin_service
        .load(&token, &key)
        .await
        .map_err(|error| ApiError::with_fallback(error, FIELDS_LOAD_FAILED_MESSAGE))?;
    let updated = state
        .schema_admin_service
        .save_field(&token, &key, &current, editing_index, input)
        .await
        .map_err(|error| ApiError::with_fallback(error, FIELD_SAVE_FAILED_MESSAGE))?;

    Ok(Json(FieldSetResponse::new(
        &updated,
        Some(UserNotice::success(FIELDS_UPDATED_MESSAGE).into()),
    )))
}

pub async fn remove_field_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path((entity_type, index)): Path<(String, usize)>,
) -> ApiResult<Json<FieldSetResponse>> {
    let key = FieldSetKey::Entity(EntityType::from_str(entity_type.as_str())?);

    let current = state
        .schema_admin_service
        .load(&token, &key)
        .await
        .map_err(|error| ApiError::with_fallback(error, FIELDS_LOAD_FAILED_MESSAGE))?;
    let updated = state
        .schema_admin_service
        .remove_field(&token, &key, &current, index)
        .await
        .map_err(|error| ApiError::with_fallback(error, FIELD_REMOVE_FAILED_MESSAGE))?;

    Ok(Json(FieldSetResponse::new(
        &updated,
        Some(UserNotice::success(FIELD_REMOVED_MESSAGE).into()),
    )))
}

pub(crate) async fn load_field_set(
    state: &AppState,
    token: &AccessToken,
    key: &FieldSetKey,
) -> ApiResult<Json<FieldSetResponse>> {
    let field_set = state
        .schema_admin_service
        .load(token, key)
        .await
        .map_err(|error| ApiError::with_fallback(error, FIELDS_LOAD_FAILED_MESSAGE))?;

    Ok(Json(FieldSetResponse::new(&field_set, None)))
}

pub(crate) async fn replace_field_set(
    state: &AppState,
    token: &AccessToken,
    key: &FieldSetKey,
    payload: ReplaceFieldsRequest,
) -> ApiResult<Json<FieldSetResponse>> {
    let descriptors = payload
        .fields
        .into_iter()
        .map(FieldDescriptor::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    let field_set = state
        .schema_admin_service
        .replace_fields(token, key, descriptors)
        .await
        .map_err(|error| ApiError::with_fallback(error, FIELD_SAVE_FAILED_MESSAGE))?;

    Ok(Json(FieldSetResponse::new(
        &field_set,
        Some(UserNotice::success(FIELDS_UPDATED_MESSAGE).into()),
    )))
}
