use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use itsm_application::UserNotice;
use itsm_core::AccessToken;
use itsm_domain::{EntityForm, EntityType};

use crate::dto::{SubmitRecordRequest, SubmitRecordResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn submit_record_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(entity_type): Path<String>,
    Json(payload): Json<SubmitRecordRequest>,
) -> ApiResult<(StatusCode, Json<SubmitRecordResponse>)> {
    let entity_type = EntityType::from_str(entity_type.as_str())?;
    let form = EntityForm::from_record(entity_type, &payload.data)?;

    let saved = state
        .record_form_service
        .submit_with_current_schemas(&token, &form, payload.record_id.as_deref())
        .await
        .map_err(|error| {
            ApiError::with_fallback(
                error,
                UserNotice::record_save_failed_message(entity_type).as_str(),
            )
        })?;

    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(SubmitRecordResponse {
            record: saved.record,
            notice: UserNotice::record_saved(entity_type, saved.created).into(),
        }),
    ))
}
