use std::sync::Arc;

use itsm_core::AppError;
use itsm_domain::{
    EntityType, EquipmentType, FieldDescriptorInput, FieldKind, FieldSet, FieldSetKey,
    SELECT_OPTIONS_REQUIRED_MESSAGE,
};

use crate::test_fakes::{FakeItsmService, descriptor, field_set, token};

use super::SchemaAdminService;

fn build_service(fake: FakeItsmService) -> (SchemaAdminService, Arc<FakeItsmService>) {
    let fake = Arc::new(fake);
    (SchemaAdminService::new(fake.clone(), fake.clone()), fake)
}

fn input(name: &str, kind: FieldKind, options: &str) -> FieldDescriptorInput {
    FieldDescriptorInput {
        name: name.to_owned(),
        kind,
        required: false,
        options: itsm_domain::FieldDescriptor::parse_options(options),
        description: None,
    }
}

const EQUIPMENT: FieldSetKey = FieldSetKey::Entity(EntityType::Equipment);

#[tokio::test]
async fn adding_a_field_writes_the_whole_list() {
    let (service, fake) = build_service(FakeItsmService::default());
    let current = field_set(&[("Número de Activo", FieldKind::Text)]);

    let updated = service
        .save_field(
            &token(),
            &EQUIPMENT,
            &current,
            None,
            input("Departamento", FieldKind::Select, "IT, Ventas, Administración"),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.len(), 2);
    assert_eq!(
        updated.fields()[1].options(),
        ["IT", "Ventas", "Administración"]
    );

    let writes = fake.writes.lock().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, EQUIPMENT);
    assert_eq!(writes[0].1, updated);
}

#[tokio::test]
async fn duplicate_name_is_rejected_before_any_write() {
    let (service, fake) = build_service(FakeItsmService::default());
    let current = field_set(&[("Serie", FieldKind::Text), ("RAM", FieldKind::Number)]);

    let result = service
        .save_field(&token(), &EQUIPMENT, &current, None, input("RAM", FieldKind::Text, ""))
        .await;

    assert!(matches!(result, Err(AppError::Validation(message)) if message == "Ya existe un campo con ese nombre"));
    assert!(fake.writes.lock().await.is_empty());
}

#[tokio::test]
async fn editing_a_field_may_keep_its_own_name() {
    let (service, fake) = build_service(FakeItsmService::default());
    let current = field_set(&[("Serie", FieldKind::Text), ("RAM", FieldKind::Text)]);

    let updated = service
        .save_field(&token(), &EQUIPMENT, &current, Some(1), input("RAM", FieldKind::Number, ""))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.fields()[1].kind(), FieldKind::Number);
    assert_eq!(fake.writes.lock().await.len(), 1);
}

#[tokio::test]
async fn select_without_options_is_rejected_before_any_write() {
    let (service, fake) = build_service(FakeItsmService::default());

    let result = service
        .save_field(
            &token(),
            &EQUIPMENT,
            &FieldSet::empty(),
            None,
            input("Departamento", FieldKind::Select, " , "),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(message)) if message == SELECT_OPTIONS_REQUIRED_MESSAGE));
    assert!(fake.writes.lock().await.is_empty());
}

#[tokio::test]
async fn replace_rejects_duplicate_names_before_any_write() {
    let (service, fake) = build_service(FakeItsmService::default());

    let result = service
        .replace_fields(
            &token(),
            &EQUIPMENT,
            vec![
                descriptor("RAM", FieldKind::Number),
                descriptor("RAM", FieldKind::Text),
            ],
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(fake.writes.lock().await.is_empty());
}

#[tokio::test]
async fn remove_field_writes_remaining_list() {
    let (service, fake) = build_service(FakeItsmService::default());
    let current = field_set(&[("Serie", FieldKind::Text), ("RAM", FieldKind::Number)]);

    let updated = service
        .remove_field(&token(), &EQUIPMENT, &current, 0)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.len(), 1);
    assert_eq!(updated.fields()[0].name(), "RAM");
    assert_eq!(fake.writes.lock().await.len(), 1);

    let out_of_range = service.remove_field(&token(), &EQUIPMENT, &current, 9).await;
    assert!(matches!(out_of_range, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn write_failures_are_returned_without_retry() {
    let (service, fake) = build_service(FakeItsmService::failing_writes("Acceso denegado"));

    let result = service
        .save_field(&token(), &EQUIPMENT, &FieldSet::empty(), None, input("Serie", FieldKind::Text, ""))
        .await;

    assert!(matches!(result, Err(AppError::Upstream(message)) if message == "Acceso denegado"));
    assert!(fake.writes.lock().await.is_empty());
}

#[tokio::test]
async fn equipment_type_sets_are_written_to_their_own_service() {
    let (service, fake) = build_service(FakeItsmService::default());
    let key = FieldSetKey::EquipmentType(
        EquipmentType::new("Switch").unwrap_or_else(|_| unreachable!()),
    );

    service
        .replace_fields(&token(), &key, vec![descriptor("Puertos", FieldKind::Number)])
        .await
        .unwrap_or_else(|_| unreachable!());

    let loaded = service
        .load(&token(), &key)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(loaded.len(), 1);
    assert!(fake.entity_fields.lock().await.is_empty());
}
