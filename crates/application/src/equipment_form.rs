use itsm_core::{AccessToken, AppError, AppResult};
use itsm_domain::{
    ControlInput, EQUIPMENT_TYPE_KEY, EntityForm, EntityType, EquipmentType, FieldNamespace,
    FieldSection, FieldSet, FormValues, render_section,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::field_schema_service::FieldSchemaService;

#[cfg(test)]
mod tests;

/// Shown when a record is submitted while the type-indexed fields are still loading.
pub const DYNAMIC_FIELDS_LOADING_MESSAGE: &str = "Espera a que carguen los campos del tipo de equipo";

/// Lifecycle of the type-indexed field set shown on the equipment form.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicFieldsState {
    /// No equipment type selected.
    Idle,
    /// A fetch for `equipment_type` is outstanding.
    Loading {
        /// Type being fetched.
        equipment_type: EquipmentType,
    },
    /// Fields for `equipment_type` are known.
    Ready {
        /// Type the fields belong to.
        equipment_type: EquipmentType,
        /// Descriptors to render.
        fields: FieldSet,
    },
    /// The fetch for `equipment_type` failed. Nothing is rendered and the
    /// stored type-indexed values are submitted unchanged.
    Unavailable {
        /// Type whose fields could not be loaded.
        equipment_type: EquipmentType,
    },
}

/// Handle for one outstanding type-indexed field fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    equipment_type: EquipmentType,
}

impl FetchTicket {
    /// Returns the normalized type to fetch.
    #[must_use]
    pub fn equipment_type(&self) -> &EquipmentType {
        &self.equipment_type
    }
}

/// What the type-indexed area of the form shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicFieldsView {
    /// Loading indicator; no fields.
    Loading,
    /// Rendered section, absent when the type has no fields.
    Section(Option<FieldSection>),
}

/// Equipment form with the type-indexed field switch.
///
/// Only the response to the most recent type selection is applied.
/// Responses for superseded selections are discarded.
#[derive(Debug, Clone)]
pub struct EquipmentFormController {
    form: EntityForm,
    state: DynamicFieldsState,
    generation: u64,
}

impl Default for EquipmentFormController {
    fn default() -> Self {
        Self::new()
    }
}

impl EquipmentFormController {
    /// Creates an empty equipment form.
    #[must_use]
    pub fn new() -> Self {
        Self {
            form: EntityForm::new(EntityType::Equipment),
            state: DynamicFieldsState::Idle,
            generation: 0,
        }
    }

    /// Returns the current form.
    #[must_use]
    pub fn form(&self) -> &EntityForm {
        &self.form
    }

    /// Returns the type-indexed field state.
    #[must_use]
    pub fn state(&self) -> &DynamicFieldsState {
        &self.state
    }

    /// Loads an existing record. Stored type-indexed values are kept.
    pub fn edit_record(&mut self, record: &Value) -> AppResult<Option<FetchTicket>> {
        self.form = EntityForm::from_record(EntityType::Equipment, record)?;
        Ok(self.begin_fetch(self.form.equipment_type()))
    }

    /// Selects a new equipment type, clearing every type-indexed value.
    pub fn select_type(&mut self, raw_type: &str) -> AppResult<Option<FetchTicket>> {
        self.form = self
            .form
            .with_attribute(EQUIPMENT_TYPE_KEY, Value::String(raw_type.to_owned()))?
            .with_dynamic_fields(FormValues::new());

        Ok(self.begin_fetch(EquipmentType::parse_optional(raw_type)))
    }

    /// Applies a fetch result. Returns `false` when the ticket was superseded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: AppResult<FieldSet>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                equipment_type = %ticket.equipment_type,
                "discarding superseded equipment type fields"
            );
            return false;
        }

        self.state = match result {
            Ok(fields) => DynamicFieldsState::Ready {
                equipment_type: ticket.equipment_type,
                fields,
            },
            Err(error) => {
                warn!(
                    equipment_type = %ticket.equipment_type,
                    error = %error,
                    "failed to load equipment type fields"
                );
                DynamicFieldsState::Unavailable {
                    equipment_type: ticket.equipment_type,
                }
            }
        };
        true
    }

    /// Selects a type and loads its fields in one step.
    pub async fn switch_type(
        &mut self,
        service: &FieldSchemaService,
        token: &AccessToken,
        raw_type: &str,
    ) -> AppResult<()> {
        if let Some(ticket) = self.select_type(raw_type)? {
            let result = service
                .load_equipment_type_fields(token, ticket.equipment_type())
                .await;
            self.complete_fetch(ticket, result);
        }

        Ok(())
    }

    /// Loads a record and its type-indexed fields in one step.
    pub async fn open_record(
        &mut self,
        service: &FieldSchemaService,
        token: &AccessToken,
        record: &Value,
    ) -> AppResult<()> {
        if let Some(ticket) = self.edit_record(record)? {
            let result = service
                .load_equipment_type_fields(token, ticket.equipment_type())
                .await;
            self.complete_fetch(ticket, result);
        }

        Ok(())
    }

    /// Sets a record attribute other than the equipment type.
    pub fn set_attribute(&mut self, key: &str, value: Value) -> AppResult<()> {
        if key == EQUIPMENT_TYPE_KEY {
            return Err(AppError::Validation(
                "use select_type to change the equipment type".to_owned(),
            ));
        }

        self.form = self.form.with_attribute(key, value)?;
        Ok(())
    }

    /// Applies a control input to a type-indexed field.
    pub fn apply_dynamic_input(&mut self, field_name: &str, input: ControlInput) -> AppResult<()> {
        let descriptor = match &self.state {
            DynamicFieldsState::Loading { .. } => {
                return Err(AppError::Validation(DYNAMIC_FIELDS_LOADING_MESSAGE.to_owned()));
            }
            DynamicFieldsState::Ready { fields, .. } => fields.find(field_name),
            DynamicFieldsState::Idle | DynamicFieldsState::Unavailable { .. } => None,
        }
        .ok_or_else(|| {
            AppError::NotFound(format!("no equipment type field named '{field_name}'"))
        })?;

        let change = descriptor.change(input)?;
        self.form = self.form.with_dynamic_change(change);
        Ok(())
    }

    /// Applies a control input to a custom field described by `custom_schema`.
    pub fn apply_custom_input(
        &mut self,
        custom_schema: &FieldSet,
        field_name: &str,
        input: ControlInput,
    ) -> AppResult<()> {
        let descriptor = custom_schema.find(field_name).ok_or_else(|| {
            AppError::NotFound(format!("no custom field named '{field_name}'"))
        })?;

        let change = descriptor.change(input)?;
        self.form = self.form.with_custom_change(change);
        Ok(())
    }

    /// Returns the type-indexed area to display. Never shows a previous type's fields.
    #[must_use]
    pub fn dynamic_view(&self) -> DynamicFieldsView {
        match &self.state {
            DynamicFieldsState::Idle | DynamicFieldsState::Unavailable { .. } => {
                DynamicFieldsView::Section(None)
            }
            DynamicFieldsState::Loading { .. } => DynamicFieldsView::Loading,
            DynamicFieldsState::Ready { fields, .. } => DynamicFieldsView::Section(render_section(
                fields,
                self.form.dynamic_fields(),
                FieldNamespace::Dynamic,
            )),
        }
    }

    /// Returns the type-indexed schema to validate against.
    ///
    /// `None` means the schema could not be loaded.
    pub fn dynamic_schema(&self) -> AppResult<Option<FieldSet>> {
        match &self.state {
            DynamicFieldsState::Idle => Ok(Some(FieldSet::empty())),
            DynamicFieldsState::Loading { .. } => Err(AppError::Validation(
                DYNAMIC_FIELDS_LOADING_MESSAGE.to_owned(),
            )),
            DynamicFieldsState::Ready { fields, .. } => Ok(Some(fields.clone())),
            DynamicFieldsState::Unavailable { .. } => Ok(None),
        }
    }

    /// Builds the record payload.
    pub fn submission(&self, custom_schema: &FieldSet) -> AppResult<Value> {
        match self.dynamic_schema()? {
            Some(dynamic_schema) => self.form.to_submission(custom_schema, &dynamic_schema),
            None => self.form.to_submission_keeping_dynamic_fields(custom_schema),
        }
    }

    fn begin_fetch(&mut self, equipment_type: Option<EquipmentType>) -> Option<FetchTicket> {
        self.generation += 1;

        let Some(equipment_type) = equipment_type else {
            self.state = DynamicFieldsState::Idle;
            return None;
        };

        self.state = DynamicFieldsState::Loading {
            equipment_type: equipment_type.clone(),
        };
        Some(FetchTicket {
            generation: self.generation,
            equipment_type,
        })
    }
}
