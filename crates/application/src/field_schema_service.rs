use std::sync::Arc;

use itsm_core::{AccessToken, AppResult};
use itsm_domain::{EntityType, EquipmentType, FieldSet};
use tracing::warn;

use crate::ports::{EntityFieldSchemaRepository, EquipmentTypeFieldSchemaRepository};


/// Reads the field sets the form renderer works from.
///
/// Read failures are never fatal: they are logged and degrade to an empty
/// field set so the owning form stays usable.
#[derive(Clone)]
pub struct FieldSchemaService {
    entity_repository: Arc<dyn EntityFieldSchemaRepository>,
    equipment_type_repository: Arc<dyn EquipmentTypeFieldSchemaRepository>,
}

impl FieldSchemaService {
    /// Creates a new field schema service.
    #[must_use]
    pub fn new(
        entity_repository: Arc<dyn EntityFieldSchemaRepository>,
        equipment_type_repository: Arc<dyn EquipmentTypeFieldSchemaRepository>,
    ) -> Self {
        Self {
            entity_repository,
            equipment_type_repository,
        }
    }

    /// Returns the custom fields of an entity type, or an empty set on failure.
    pub async fn entity_fields(&self, token: &AccessToken, entity_type: EntityType) -> FieldSet {
        match self
            .entity_repository
            .fetch_entity_fields(token, entity_type)
            .await
        {
            Ok(fields) => fields,
            Err(error) => {
                warn!(
                    entity_type = %entity_type,
                    error = %error,
                    "failed to fetch custom field schema"
                );
                FieldSet::empty()
            }
        }
    }

    /// Returns the type-indexed fields for a raw equipment type, or an empty set.
    ///
    /// A blank type yields an empty set without calling the repository.
    pub async fn equipment_type_fields(&self, token: &AccessToken, raw_type: &str) -> FieldSet {
        let Some(equipment_type) = EquipmentType::parse_optional(raw_type) else {
            return FieldSet::empty();
        };

        match self.load_equipment_type_fields(token, &equipment_type).await {
            Ok(fields) => fields,
            Err(error) => {
                warn!(
                    equipment_type = %equipment_type,
                    error = %error,
                    "failed to fetch equipment type field schema"
                );
                FieldSet::empty()
            }
        }
    }

    /// Fetches the type-indexed fields of a normalized equipment type, propagating errors.
    pub async fn load_equipment_type_fields(
        &self,
        token: &AccessToken,
        equipment_type: &EquipmentType,
    ) -> AppResult<FieldSet> {
        self.equipment_type_repository
            .fetch_equipment_type_fields(token, equipment_type)
            .await
    }
}
