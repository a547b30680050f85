use axum::Json;
use axum::extract::{Extension, Path, State};
use itsm_core::AccessToken;
use itsm_domain::{EquipmentType, FieldSetKey};

use super::fields::{load_field_set, replace_field_set};
use crate::dto::{FieldSetResponse, ReplaceFieldsRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_equipment_type_fields_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(equipment_type): Path<String>,
) -> ApiResult<Json<FieldSetResponse>> {
    let key = FieldSetKey::EquipmentType(EquipmentType::new(equipment_type)?);
    load_field_set(&state, &token, &key).await
}

pub async fn replace_equipment_type_fields_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(equipment_type): Path<String>,
    Json(payload): Json<ReplaceFieldsRequest>,
) -> ApiResult<Json<FieldSetResponse>> {
    let key = FieldSetKey::EquipmentType(EquipmentType::new(equipment_type)?);
    replace_field_set(&state, &token, &key, payload).await
}
