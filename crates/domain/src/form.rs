use std::collections::BTreeSet;

use itsm_core::{AppError, AppResult};
use serde_json::{Map, Value};

use crate::{EntityType, EquipmentType, FieldChange, FieldSet, FormValues};

/// Reserved record key holding the custom-fields bag.
pub const CUSTOM_FIELDS_KEY: &str = "campos_personalizados";

/// Reserved record key holding the type-indexed fields bag.
pub const DYNAMIC_FIELDS_KEY: &str = "campos_dinamicos";

/// Record attribute holding the equipment type.
pub const EQUIPMENT_TYPE_KEY: &str = "tipo";

/// Form state of one entity record.
///
/// Custom fields and type-indexed fields live in two independent
/// namespaces next to the record's own attributes. Every update returns a
/// new form. Values loaded from a stored record are carried as they are;
/// only values changed through the form are type-checked on submission.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityForm {
    entity_type: EntityType,
    attributes: Map<String, Value>,
    custom_fields: FormValues,
    dynamic_fields: FormValues,
    edited_custom: BTreeSet<String>,
    edited_dynamic: BTreeSet<String>,
}

impl EntityForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            attributes: Map::new(),
            custom_fields: FormValues::new(),
            dynamic_fields: FormValues::new(),
            edited_custom: BTreeSet::new(),
            edited_dynamic: BTreeSet::new(),
        }
    }

    /// Loads a stored record into a form.
    pub fn from_record(entity_type: EntityType, record: &Value) -> AppResult<Self> {
        let object = record.as_object().ok_or_else(|| {
            AppError::Validation("record payload must be a JSON object".to_owned())
        })?;

        let custom_fields = FormValues::from_json(object.get(CUSTOM_FIELDS_KEY))?;
        let dynamic_fields = FormValues::from_json(object.get(DYNAMIC_FIELDS_KEY))?;
        let attributes = object
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            entity_type,
            attributes,
            custom_fields,
            dynamic_fields,
            edited_custom: BTreeSet::new(),
            edited_dynamic: BTreeSet::new(),
        })
    }

    /// Returns the owning entity type.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Returns the record's own attributes.
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns the custom-fields bag.
    #[must_use]
    pub fn custom_fields(&self) -> &FormValues {
        &self.custom_fields
    }

    /// Returns the type-indexed fields bag.
    #[must_use]
    pub fn dynamic_fields(&self) -> &FormValues {
        &self.dynamic_fields
    }

    /// Returns the normalized equipment type held in the `tipo` attribute.
    #[must_use]
    pub fn equipment_type(&self) -> Option<EquipmentType> {
        self.attributes
            .get(EQUIPMENT_TYPE_KEY)
            .and_then(Value::as_str)
            .and_then(EquipmentType::parse_optional)
    }

    /// Returns a copy with one record attribute set.
    pub fn with_attribute(&self, key: impl Into<String>, value: Value) -> AppResult<Self> {
        let key = key.into();
        if is_reserved_key(key.as_str()) {
            return Err(AppError::Validation(format!(
                "'{key}' is reserved for field bags"
            )));
        }

        let mut form = self.clone();
        form.attributes.insert(key, value);
        Ok(form)
    }

    /// Returns a copy with a custom-field change applied.
    #[must_use]
    pub fn with_custom_change(&self, change: FieldChange) -> Self {
        let mut edited_custom = self.edited_custom.clone();
        edited_custom.insert(change.field_name.clone());

        Self {
            custom_fields: self.custom_fields.apply(change),
            edited_custom,
            ..self.clone()
        }
    }

    /// Returns a copy with a type-indexed field change applied.
    #[must_use]
    pub fn with_dynamic_change(&self, change: FieldChange) -> Self {
        let mut edited_dynamic = self.edited_dynamic.clone();
        edited_dynamic.insert(change.field_name.clone());

        Self {
            dynamic_fields: self.dynamic_fields.apply(change),
            edited_dynamic,
            ..self.clone()
        }
    }

    /// Returns a copy with the whole type-indexed bag replaced.
    ///
    /// The replacement counts as stored data, not as edits.
    #[must_use]
    pub fn with_dynamic_fields(&self, dynamic_fields: FormValues) -> Self {
        Self {
            dynamic_fields,
            edited_dynamic: BTreeSet::new(),
            ..self.clone()
        }
    }

    /// Returns a copy with the whole custom-fields bag replaced.
    ///
    /// The replacement counts as stored data, not as edits.
    #[must_use]
    pub fn with_custom_fields(&self, custom_fields: FormValues) -> Self {
        Self {
            custom_fields,
            edited_custom: BTreeSet::new(),
            ..self.clone()
        }
    }

    /// Validates required and typed values, then builds the record payload.
    ///
    /// Required fields of both schemas must hold a value. Only values
    /// changed through this form must fit their descriptor; stored values
    /// pass through even when the schema has changed since they were saved.
    /// Type-indexed entries not described by `dynamic_schema` are dropped.
    /// Custom entries are kept even when their descriptor no longer exists.
    pub fn to_submission(
        &self,
        custom_schema: &FieldSet,
        dynamic_schema: &FieldSet,
    ) -> AppResult<Value> {
        self.build_submission(custom_schema, Some(dynamic_schema))
    }

    /// Builds the record payload when the type-indexed schema is unknown.
    ///
    /// The type-indexed bag is sent exactly as held, without filtering or
    /// validation.
    pub fn to_submission_keeping_dynamic_fields(
        &self,
        custom_schema: &FieldSet,
    ) -> AppResult<Value> {
        self.build_submission(custom_schema, None)
    }

    fn build_submission(
        &self,
        custom_schema: &FieldSet,
        dynamic_schema: Option<&FieldSet>,
    ) -> AppResult<Value> {
        validate_bag(&self.custom_fields, custom_schema, &self.edited_custom)?;

        let mut payload = self.attributes.clone();
        payload.insert(
            CUSTOM_FIELDS_KEY.to_owned(),
            Value::Object(self.custom_fields.to_json_object()),
        );

        if self.entity_type == EntityType::Equipment {
            let dynamic_fields = match dynamic_schema {
                Some(dynamic_schema) => {
                    let described = self.dynamic_fields.retain_described(dynamic_schema);
                    validate_bag(&described, dynamic_schema, &self.edited_dynamic)?;
                    described
                }
                None => self.dynamic_fields.clone(),
            };
            payload.insert(
                DYNAMIC_FIELDS_KEY.to_owned(),
                Value::Object(dynamic_fields.to_json_object()),
            );
        }

        Ok(Value::Object(payload))
    }
}

fn is_reserved_key(key: &str) -> bool {
    key == CUSTOM_FIELDS_KEY || key == DYNAMIC_FIELDS_KEY
}

fn validate_bag(
    values: &FormValues,
    schema: &FieldSet,
    edited: &BTreeSet<String>,
) -> AppResult<()> {
    for descriptor in schema {
        match values.get(descriptor.name()) {
            Some(value) if !value.is_blank() => {
                if edited.contains(descriptor.name()) {
                    descriptor.validate_value(value)?;
                }
            }
            _ if descriptor.is_required() => {
                return Err(AppError::Validation(format!(
                    "El campo '{}' es obligatorio",
                    descriptor.name()
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
