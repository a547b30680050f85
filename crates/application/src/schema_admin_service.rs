use std::sync::Arc;

use itsm_core::{AccessToken, AppError, AppResult};
use itsm_domain::{FieldDescriptor, FieldDescriptorInput, FieldSet, FieldSetKey};
use tracing::{info, warn};

use crate::ports::{EntityFieldSchemaRepository, EquipmentTypeFieldSchemaRepository};

#[cfg(test)]
mod tests;

/// Administers field sets with replace-the-whole-list semantics.
///
/// Every edit is validated against the administrator's current list before
/// anything is written; a rejected edit never reaches the repository.
#[derive(Clone)]
pub struct SchemaAdminService {
    entity_repository: Arc<dyn EntityFieldSchemaRepository>,
    equipment_type_repository: Arc<dyn EquipmentTypeFieldSchemaRepository>,
}

impl SchemaAdminService {
    /// Creates a new schema administration service.
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

    /// Loads the field set shown on the configuration screen.
    pub async fn load(&self, token: &AccessToken, key: &FieldSetKey) -> AppResult<FieldSet> {
        match key {
            FieldSetKey::Entity(entity_type) => {
                self.entity_repository
                    .fetch_entity_fields(token, *entity_type)
                    .await
            }
            FieldSetKey::EquipmentType(equipment_type) => {
                self.equipment_type_repository
                    .fetch_equipment_type_fields(token, equipment_type)
                    .await
            }
        }
    }

    /// Adds a field, or replaces the field at `editing_index`, and writes the new list.
    pub async fn save_field(
        &self,
        token: &AccessToken,
        key: &FieldSetKey,
        current: &FieldSet,
        editing_index: Option<usize>,
        input: FieldDescriptorInput,
    ) -> AppResult<FieldSet> {
        let name = input.name.trim();
        let name_taken = current
            .iter()
            .enumerate()
            .any(|(index, field)| Some(index) != editing_index && field.name() == name);
        if name_taken {
            return Err(AppError::Validation(
                "Ya existe un campo con ese nombre".to_owned(),
            ));
        }

        let descriptor = FieldDescriptor::new(input)?;
        let updated = match editing_index {
            Some(index) => current.with_replaced(index, descriptor)?,
            None => current.with_added(descriptor)?,
        };

        self.write(token, key, &updated).await?;
        Ok(updated)
    }

    /// Removes the field at `index` and writes the new list.
    pub async fn remove_field(
        &self,
        token: &AccessToken,
        key: &FieldSetKey,
        current: &FieldSet,
        index: usize,
    ) -> AppResult<FieldSet> {
        let updated = current.without(index)?;
        self.write(token, key, &updated).await?;
        Ok(updated)
    }

    /// Validates and writes a complete list of descriptors.
    pub async fn replace_fields(
        &self,
        token: &AccessToken,
        key: &FieldSetKey,
        fields: Vec<FieldDescriptor>,
    ) -> AppResult<FieldSet> {
        let field_set = FieldSet::new(fields)?;
        self.write(token, key, &field_set).await?;
        Ok(field_set)
    }

    async fn write(
        &self,
        token: &AccessToken,
        key: &FieldSetKey,
        field_set: &FieldSet,
    ) -> AppResult<()> {
        let result = match key {
            FieldSetKey::Entity(entity_type) => {
                self.entity_repository
                    .replace_entity_fields(token, *entity_type, field_set)
                    .await
            }
            FieldSetKey::EquipmentType(equipment_type) => {
                self.equipment_type_repository
                    .replace_equipment_type_fields(token, equipment_type, field_set)
                    .await
            }
        };

        match &result {
            Ok(()) => info!(
                field_set = %key,
                field_count = field_set.len(),
                "field set replaced"
            ),
            Err(error) => warn!(
                field_set = %key,
                error = %error,
                "failed to replace field set"
            ),
        }

        result
    }
}
