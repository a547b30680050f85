//! Application services and ports.

#![forbid(unsafe_code)]

mod equipment_form;
mod field_schema_service;
mod notice;
mod ports;
mod record_form_service;
mod schema_admin_service;

#[cfg(test)]
mod test_fakes;

pub use equipment_form::{
    DYNAMIC_FIELDS_LOADING_MESSAGE, DynamicFieldsState, DynamicFieldsView,
    EquipmentFormController, FetchTicket,
};
pub use field_schema_service::FieldSchemaService;
pub use notice::{
    FIELD_REMOVE_FAILED_MESSAGE, FIELD_REMOVED_MESSAGE, FIELD_SAVE_FAILED_MESSAGE,
    FIELDS_LOAD_FAILED_MESSAGE, FIELDS_UPDATED_MESSAGE, NoticeLevel, UserNotice,
};
pub use ports::{EntityFieldSchemaRepository, EquipmentTypeFieldSchemaRepository, RecordGateway};
pub use record_form_service::{RecordFormService, SavedRecord};
pub use schema_admin_service::SchemaAdminService;
