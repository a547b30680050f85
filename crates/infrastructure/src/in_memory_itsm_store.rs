use std::collections::HashMap;

use async_trait::async_trait;
use itsm_application::{EntityFieldSchemaRepository, EquipmentTypeFieldSchemaRepository, RecordGateway};
use itsm_core::{AccessToken, AppError, AppResult};
use itsm_domain::{EntityType, EquipmentType, FieldSet};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Record attribute holding the identifier assigned on creation.
const RECORD_ID_KEY: &str = "id";

/// In-memory ITSM store implementation.
#[derive(Debug, Default)]
pub struct InMemoryItsmStore {
    entity_fields: RwLock<HashMap<EntityType, FieldSet>>,
    equipment_type_fields: RwLock<HashMap<EquipmentType, FieldSet>>,
    records: RwLock<HashMap<(EntityType, String), Value>>,
}

impl InMemoryItsmStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a stored record.
    pub async fn find_record(&self, entity_type: EntityType, record_id: &str) -> Option<Value> {
        self.records
            .read()
            .await
            .get(&(entity_type, record_id.to_owned()))
            .cloned()
    }
}

fn with_record_id(payload: Value, record_id: &str) -> AppResult<Value> {
    let Value::Object(mut object) = payload else {
        return Err(AppError::Validation(
            "record payload must be a JSON object".to_owned(),
        ));
    };

    object.insert(RECORD_ID_KEY.to_owned(), Value::String(record_id.to_owned()));
    Ok(Value::Object(object))
}

#[async_trait]
impl EntityFieldSchemaRepository for InMemoryItsmStore {
    async fn fetch_entity_fields(
        &self,
        _token: &AccessToken,
        entity_type: EntityType,
    ) -> AppResult<FieldSet> {
        Ok(self
            .entity_fields
            .read()
            .await
            .get(&entity_type)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_entity_fields(
        &self,
        _token: &AccessToken,
        entity_type: EntityType,
        fields: &FieldSet,
    ) -> AppResult<()> {
        self.entity_fields
            .write()
            .await
            .insert(entity_type, fields.clone());
        Ok(())
    }
}

#[async_trait]
impl EquipmentTypeFieldSchemaRepository for InMemoryItsmStore {
    async fn fetch_equipment_type_fields(
        &self,
        _token: &AccessToken,
        equipment_type: &EquipmentType,
    ) -> AppResult<FieldSet> {
        Ok(self
            .equipment_type_fields
            .read()
            .await
            .get(equipment_type)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_equipment_type_fields(
        &self,
        _token: &AccessToken,
        equipment_type: &EquipmentType,
        fields: &FieldSet,
    ) -> AppResult<()> {
        self.equipment_type_fields
            .write()
            .await
            .insert(equipment_type.clone(), fields.clone());
        Ok(())
    }
}

#[async_trait]
impl RecordGateway for InMemoryItsmStore {
    async fn create_record(
        &self,
        _token: &AccessToken,
        entity_type: EntityType,
        payload: Value,
    ) -> AppResult<Value> {
        let record_id = Uuid::new_v4().to_string();
        let record = with_record_id(payload, record_id.as_str())?;

        self.records
            .write()
            .await
            .insert((entity_type, record_id), record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        _token: &AccessToken,
        entity_type: EntityType,
        record_id: &str,
        payload: Value,
    ) -> AppResult<Value> {
        let key = (entity_type, record_id.to_owned());
        let mut records = self.records.write().await;
        let Some(stored) = records.get_mut(&key) else {
            return Err(AppError::NotFound(format!(
                "{} '{record_id}' does not exist",
                entity_type.singular_name()
            )));
        };

        let record = with_record_id(payload, record_id)?;
        *stored = record.clone();
        Ok(record)
    }
}
