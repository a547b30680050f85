use std::sync::Arc;

use itsm_application::{
    EntityFieldSchemaRepository, EquipmentTypeFieldSchemaRepository, FieldSchemaService,
    RecordFormService, RecordGateway, SchemaAdminService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub field_schema_service: FieldSchemaService,
    pub schema_admin_service: SchemaAdminService,
    pub record_form_service: RecordFormService,
}

impl AppState {
    pub fn new(
        entity_repository: Arc<dyn EntityFieldSchemaRepository>,
        equipment_type_repository: Arc<dyn EquipmentTypeFieldSchemaRepository>,
        record_gateway: Arc<dyn RecordGateway>,
    ) -> Self {
        let field_schema_service = FieldSchemaService::new(
            entity_repository.clone(),
            equipment_type_repository.clone(),
        );

        Self {
            schema_admin_service: SchemaAdminService::new(
                entity_repository,
                equipment_type_repository,
            ),
            record_form_service: RecordFormService::new(
                record_gateway,
                field_schema_service.clone(),
            ),
            field_schema_service,
        }
    }
}
