use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use itsm_application::{DynamicFieldsView, EquipmentFormController};
use itsm_core::AccessToken;
use itsm_domain::{EntityForm, EntityType, FieldNamespace, render_section};

use crate::dto::{FieldSectionResponse, RenderFormRequest, RenderFormResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn render_form_handler(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(entity_type): Path<String>,
    Json(payload): Json<RenderFormRequest>,
) -> ApiResult<Json<RenderFormResponse>> {
    let entity_type = EntityType::from_str(entity_type.as_str())?;
    let form = match &payload.record {
        Some(record) => EntityForm::from_record(entity_type, record)?,
        None => EntityForm::new(entity_type),
    };

    let custom_fields = state
        .field_schema_service
        .entity_fields(&token, entity_type)
        .await;
    let custom_section = render_section(
        &custom_fields,
        form.custom_fields(),
        FieldNamespace::Custom,
    )
    .map(FieldSectionResponse::from);

    let dynamic_section = if entity_type == EntityType::Equipment {
        render_dynamic_section(&state, &token, &payload).await?
    } else {
        None
    };

    Ok(Json(RenderFormResponse {
        custom_section,
        dynamic_section,
    }))
}

async fn render_dynamic_section(
    state: &AppState,
    token: &AccessToken,
    payload: &RenderFormRequest,
) -> ApiResult<Option<FieldSectionResponse>> {
    let service = &state.field_schema_service;
    let mut controller = EquipmentFormController::new();

    match (&payload.record, payload.equipment_type.as_deref()) {
        (Some(record), None) => controller.open_record(service, token, record).await?,
        (record, Some(raw_type)) => {
            if let Some(record) = record {
                // superseded by the type switch below
                let _ticket = controller.edit_record(record)?;
            }
            controller.switch_type(service, token, raw_type).await?;
        }
        (None, None) => {}
    }

    Ok(match controller.dynamic_view() {
        DynamicFieldsView::Section(section) => section.map(FieldSectionResponse::from),
        DynamicFieldsView::Loading => None,
    })
}
