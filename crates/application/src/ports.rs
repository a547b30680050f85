use async_trait::async_trait;
use itsm_core::{AccessToken, AppResult};
use itsm_domain::{EntityType, EquipmentType, FieldSet};
use serde_json::Value;

/// Configuration service holding custom field sets per entity type.
#[async_trait]
pub trait EntityFieldSchemaRepository: Send + Sync {
    /// Reads the field set of an entity type. A missing schema is an empty set.
    async fn fetch_entity_fields(
        &self,
        token: &AccessToken,
        entity_type: EntityType,
    ) -> AppResult<FieldSet>;

    /// Replaces the whole field set of an entity type.
    async fn replace_entity_fields(
        &self,
        token: &AccessToken,
        entity_type: EntityType,
        fields: &FieldSet,
    ) -> AppResult<()>;
}

/// Configuration service holding type-indexed field sets per equipment type.
#[async_trait]
pub trait EquipmentTypeFieldSchemaRepository: Send + Sync {
    /// Reads the field set of a normalized equipment type. A missing schema is an empty set.
    async fn fetch_equipment_type_fields(
        &self,
        token: &AccessToken,
        equipment_type: &EquipmentType,
    ) -> AppResult<FieldSet>;

    /// Replaces the whole field set of an equipment type.
    async fn replace_equipment_type_fields(
        &self,
        token: &AccessToken,
        equipment_type: &EquipmentType,
        fields: &FieldSet,
    ) -> AppResult<()>;
}

/// Record persistence of the ITSM service.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Creates a record and returns the stored representation.
    async fn create_record(
        &self,
        token: &AccessToken,
        entity_type: EntityType,
        payload: Value,
    ) -> AppResult<Value>;

    /// Updates a record and returns the stored representation.
    async fn update_record(
        &self,
        token: &AccessToken,
        entity_type: EntityType,
        record_id: &str,
        payload: Value,
    ) -> AppResult<Value>;
}
