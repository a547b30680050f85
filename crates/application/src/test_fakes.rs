use std::collections::HashMap;

use async_trait::async_trait;
use itsm_core::{AccessToken, AppError, AppResult};
use itsm_domain::{
    EntityType, EquipmentType, FieldDescriptor, FieldDescriptorInput, FieldKind, FieldSet,
    FieldSetKey,
};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::ports::{EntityFieldSchemaRepository, EquipmentTypeFieldSchemaRepository, RecordGateway};

#[derive(Default)]
pub(crate) struct FakeItsmService {
    pub entity_fields: Mutex<HashMap<EntityType, FieldSet>>,
    pub equipment_type_fields: Mutex<HashMap<EquipmentType, FieldSet>>,
    pub fetches: Mutex<Vec<FieldSetKey>>,
    pub writes: Mutex<Vec<(FieldSetKey, FieldSet)>>,
    pub records: Mutex<Vec<(EntityType, Option<String>, Value)>>,
    pub read_error: Option<AppError>,
    pub write_error: Option<AppError>,
}

impl FakeItsmService {
    pub fn failing_reads() -> Self {
        Self {
            read_error: Some(AppError::Upstream("connection refused".to_owned())),
            ..Self::default()
        }
    }

    pub fn failing_writes(message: &str) -> Self {
        Self {
            write_error: Some(AppError::Upstream(message.to_owned())),
            ..Self::default()
        }
    }

    pub async fn with_equipment_type(self, raw_type: &str, fields: FieldSet) -> Self {
        let equipment_type = EquipmentType::new(raw_type).unwrap_or_else(|_| unreachable!());
        self.equipment_type_fields
            .lock()
            .await
            .insert(equipment_type, fields);
        self
    }

    pub async fn with_entity(self, entity_type: EntityType, fields: FieldSet) -> Self {
        self.entity_fields.lock().await.insert(entity_type, fields);
        self
    }
}

#[async_trait]
impl EntityFieldSchemaRepository for FakeItsmService {
    async fn fetch_entity_fields(
        &self,
        _token: &AccessToken,
        entity_type: EntityType,
    ) -> AppResult<FieldSet> {
        self.fetches
            .lock()
            .await
            .push(FieldSetKey::Entity(entity_type));
        if let Some(error) = &self.read_error {
            return Err(error.clone());
        }

        Ok(self
            .entity_fields
            .lock()
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
        if let Some(error) = &self.write_error {
            return Err(error.clone());
        }

        self.writes
            .lock()
            .await
            .push((FieldSetKey::Entity(entity_type), fields.clone()));
        self.entity_fields
            .lock()
            .await
            .insert(entity_type, fields.clone());
        Ok(())
    }
}

#[async_trait]
impl EquipmentTypeFieldSchemaRepository for FakeItsmService {
    async fn fetch_equipment_type_fields(
        &self,
        _token: &AccessToken,
        equipment_type: &EquipmentType,
    ) -> AppResult<FieldSet> {
        self.fetches
            .lock()
            .await
            .push(FieldSetKey::EquipmentType(equipment_type.clone()));
        if let Some(error) = &self.read_error {
            return Err(error.clone());
        }

        Ok(self
            .equipment_type_fields
            .lock()
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
        if let Some(error) = &self.write_error {
            return Err(error.clone());
        }

        self.writes.lock().await.push((
            FieldSetKey::EquipmentType(equipment_type.clone()),
            fields.clone(),
        ));
        self.equipment_type_fields
            .lock()
            .await
            .insert(equipment_type.clone(), fields.clone());
        Ok(())
    }
}

#[async_trait]
impl RecordGateway for FakeItsmService {
    async fn create_record(
        &self,
        _token: &AccessToken,
        entity_type: EntityType,
        payload: Value,
    ) -> AppResult<Value> {
        if let Some(error) = &self.write_error {
            return Err(error.clone());
        }

        self.records
            .lock()
            .await
            .push((entity_type, None, payload.clone()));
        Ok(payload)
    }

    async fn update_record(
        &self,
        _token: &AccessToken,
        entity_type: EntityType,
        record_id: &str,
        payload: Value,
    ) -> AppResult<Value> {
        if let Some(error) = &self.write_error {
            return Err(error.clone());
        }

        self.records
            .lock()
            .await
            .push((entity_type, Some(record_id.to_owned()), payload.clone()));
        Ok(payload)
    }
}

pub(crate) fn token() -> AccessToken {
    AccessToken::new("test-token").unwrap_or_else(|_| unreachable!())
}

pub(crate) fn descriptor(name: &str, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor::new(FieldDescriptorInput {
        name: name.to_owned(),
        kind,
        required: false,
        options: vec!["24".to_owned(), "48".to_owned()],
        description: None,
    })
    .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn field_set(names: &[(&str, FieldKind)]) -> FieldSet {
    FieldSet::new(
        names
            .iter()
            .map(|(name, kind)| descriptor(name, *kind))
            .collect(),
    )
    .unwrap_or_else(|_| unreachable!())
}
