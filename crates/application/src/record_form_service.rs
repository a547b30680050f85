use std::sync::Arc;

use itsm_core::{AccessToken, AppResult};
use itsm_domain::{EntityForm, EntityType, FieldSet};
use serde_json::Value;
use tracing::{info, warn};

use crate::field_schema_service::FieldSchemaService;
use crate::ports::RecordGateway;


/// Outcome of a saved record form.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRecord {
    /// Stored representation returned by the ITSM service.
    pub record: Value,
    /// Whether the record was created rather than updated.
    pub created: bool,
}

/// Validates record forms and sends them to the ITSM service.
#[derive(Clone)]
pub struct RecordFormService {
    record_gateway: Arc<dyn RecordGateway>,
    field_schema_service: FieldSchemaService,
}

impl RecordFormService {
    /// Creates a new record form service.
    #[must_use]
    pub fn new(
        record_gateway: Arc<dyn RecordGateway>,
        field_schema_service: FieldSchemaService,
    ) -> Self {
        Self {
            record_gateway,
            field_schema_service,
        }
    }

    /// Validates `form` against the given schemas and creates or updates the record.
    pub async fn submit(
        &self,
        token: &AccessToken,
        form: &EntityForm,
        custom_schema: &FieldSet,
        dynamic_schema: &FieldSet,
        record_id: Option<&str>,
    ) -> AppResult<SavedRecord> {
        let payload = form.to_submission(custom_schema, dynamic_schema)?;
        self.send(token, form.entity_type(), payload, record_id).await
    }

    /// Fetches the schemas currently in force for `form`, then submits it.
    ///
    /// When the equipment type schema cannot be read, the stored
    /// type-indexed values are sent unchanged.
    pub async fn submit_with_current_schemas(
        &self,
        token: &AccessToken,
        form: &EntityForm,
        record_id: Option<&str>,
    ) -> AppResult<SavedRecord> {
        let custom_schema = self
            .field_schema_service
            .entity_fields(token, form.entity_type())
            .await;

        match self.current_dynamic_schema(token, form).await {
            Some(dynamic_schema) => {
                self.submit(token, form, &custom_schema, &dynamic_schema, record_id)
                    .await
            }
            None => {
                let payload = form.to_submission_keeping_dynamic_fields(&custom_schema)?;
                self.send(token, form.entity_type(), payload, record_id).await
            }
        }
    }

    async fn send(
        &self,
        token: &AccessToken,
        entity_type: EntityType,
        payload: Value,
        record_id: Option<&str>,
    ) -> AppResult<SavedRecord> {
        let saved = match record_id {
            Some(record_id) => {
                let record = self
                    .record_gateway
                    .update_record(token, entity_type, record_id, payload)
                    .await?;
                SavedRecord {
                    record,
                    created: false,
                }
            }
            None => {
                let record = self
                    .record_gateway
                    .create_record(token, entity_type, payload)
                    .await?;
                SavedRecord {
                    record,
                    created: true,
                }
            }
        };

        info!(
            entity_type = %entity_type,
            record_id = record_id.unwrap_or("new"),
            created = saved.created,
            "record form submitted"
        );

        Ok(saved)
    }

    async fn current_dynamic_schema(
        &self,
        token: &AccessToken,
        form: &EntityForm,
    ) -> Option<FieldSet> {
        if form.entity_type() != EntityType::Equipment {
            return Some(FieldSet::empty());
        }
        let Some(equipment_type) = form.equipment_type() else {
            return Some(FieldSet::empty());
        };

        match self
            .field_schema_service
            .load_equipment_type_fields(token, &equipment_type)
            .await
        {
            Ok(fields) => Some(fields),
            Err(error) => {
                warn!(
                    equipment_type = %equipment_type,
                    error = %error,
                    "equipment type fields unavailable, keeping stored values"
                );
                None
            }
        }
    }
}
