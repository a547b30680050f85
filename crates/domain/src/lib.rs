//! Domain model of the schema-driven custom fields.

#![forbid(unsafe_code)]

mod field;
mod field_set;
mod form;
mod render;
mod value;

pub use field::{
    ControlInput, DATE_FORMAT, FieldDescriptor, FieldDescriptorInput, FieldKind,
    SELECT_OPTIONS_REQUIRED_MESSAGE,
};
pub use field_set::{EntityType, EquipmentType, FIELDS_KEY_PREFIX, FieldSet, FieldSetKey};
pub use form::{CUSTOM_FIELDS_KEY, DYNAMIC_FIELDS_KEY, EQUIPMENT_TYPE_KEY, EntityForm};
pub use render::{
    FieldControl, FieldNamespace, FieldSection, SELECT_PLACEHOLDER, Widget, render_field,
    render_field_set, render_section,
};
pub use value::{FieldChange, FieldValue, FormValues};
