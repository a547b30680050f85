use std::sync::Arc;

use itsm_core::AppError;
use itsm_domain::{
    ControlInput, DYNAMIC_FIELDS_KEY, EQUIPMENT_TYPE_KEY, FieldKind, FieldSet, FieldValue, Widget,
};
use serde_json::json;

use crate::field_schema_service::FieldSchemaService;
use crate::test_fakes::{FakeItsmService, field_set, token};

use super::{
    DYNAMIC_FIELDS_LOADING_MESSAGE, DynamicFieldsState, DynamicFieldsView,
    EquipmentFormController,
};

fn control_names(view: &DynamicFieldsView) -> Vec<String> {
    match view {
        DynamicFieldsView::Section(Some(section)) => section
            .controls
            .iter()
            .map(|control| control.field_name.clone())
            .collect(),
        _ => Vec::new(),
    }
}

async fn schema_service() -> FieldSchemaService {
    let fake = FakeItsmService::default()
        .with_equipment_type(
            "Laptop",
            field_set(&[("RAM", FieldKind::Number), ("CPU", FieldKind::Text)]),
        )
        .await
        .with_equipment_type("Switch", field_set(&[("Puertos", FieldKind::Number)]))
        .await;
    let fake = Arc::new(fake);
    FieldSchemaService::new(fake.clone(), fake)
}

#[tokio::test]
async fn switching_type_replaces_fields_and_clears_values() {
    let service = schema_service().await;
    let mut controller = EquipmentFormController::new();

    controller
        .switch_type(&service, &token(), "Laptop")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(control_names(&controller.dynamic_view()), vec!["RAM", "CPU"]);

    controller
        .apply_dynamic_input("RAM", ControlInput::Text("16".to_owned()))
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(
        controller.form().dynamic_fields().get("RAM"),
        Some(&FieldValue::Number(16.0))
    );

    controller
        .switch_type(&service, &token(), "Switch")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(control_names(&controller.dynamic_view()), vec!["Puertos"]);
    assert!(controller.form().dynamic_fields().is_empty());
    assert_eq!(
        controller.form().attributes().get(EQUIPMENT_TYPE_KEY),
        Some(&json!("Switch"))
    );
}

#[test]
fn loading_state_never_shows_previous_fields() {
    let mut controller = EquipmentFormController::new();
    let laptop = controller
        .select_type("Laptop")
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());
    controller.complete_fetch(laptop, Ok(field_set(&[("RAM", FieldKind::Number)])));

    let switch = controller
        .select_type("switch")
        .unwrap_or_else(|_| unreachable!());
    assert!(switch.is_some());
    assert_eq!(controller.dynamic_view(), DynamicFieldsView::Loading);
}

#[test]
fn superseded_response_is_discarded() {
    let mut controller = EquipmentFormController::new();
    let laptop = controller
        .select_type("Laptop")
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());
    let switch = controller
        .select_type("Switch")
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());

    assert!(controller.complete_fetch(switch, Ok(field_set(&[("Puertos", FieldKind::Number)]))));
    assert!(!controller.complete_fetch(laptop, Ok(field_set(&[("RAM", FieldKind::Number)]))));

    assert_eq!(control_names(&controller.dynamic_view()), vec!["Puertos"]);
    assert!(matches!(
        controller.state(),
        DynamicFieldsState::Ready { equipment_type, .. } if equipment_type.as_str() == "switch"
    ));
}

#[test]
fn failed_fetch_degrades_to_no_section() {
    let mut controller = EquipmentFormController::new();
    let ticket = controller
        .select_type("Laptop")
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());

    assert!(controller.complete_fetch(ticket, Err(AppError::Upstream("timeout".to_owned()))));
    assert_eq!(controller.dynamic_view(), DynamicFieldsView::Section(None));
    assert!(matches!(
        controller.state(),
        DynamicFieldsState::Unavailable { equipment_type } if equipment_type.as_str() == "laptop"
    ));
    assert!(controller.submission(&FieldSet::empty()).is_ok());
}

#[test]
fn failed_fetch_keeps_stored_values_in_the_submission() {
    let mut controller = EquipmentFormController::new();
    let ticket = controller
        .edit_record(&json!({
            "tipo": "Laptop",
            DYNAMIC_FIELDS_KEY: {"RAM": 16, "CPU": "i7"}
        }))
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());

    controller.complete_fetch(ticket, Err(AppError::Upstream("timeout".to_owned())));

    let payload = controller
        .submission(&FieldSet::empty())
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(payload[DYNAMIC_FIELDS_KEY], json!({"CPU": "i7", "RAM": 16.0}));
}

#[test]
fn blank_type_is_idle_without_fetch() {
    let mut controller = EquipmentFormController::new();

    let ticket = controller
        .select_type("   ")
        .unwrap_or_else(|_| unreachable!());

    assert!(ticket.is_none());
    assert_eq!(controller.state(), &DynamicFieldsState::Idle);
    assert_eq!(controller.dynamic_view(), DynamicFieldsView::Section(None));
}

#[tokio::test]
async fn editing_a_record_keeps_stored_values() {
    let service = schema_service().await;
    let mut controller = EquipmentFormController::new();

    controller
        .open_record(
            &service,
            &token(),
            &json!({
                "nombre": "PC-01",
                "tipo": "Laptop",
                DYNAMIC_FIELDS_KEY: {"RAM": 32, "CPU": "i7"}
            }),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let DynamicFieldsView::Section(Some(section)) = controller.dynamic_view() else {
        unreachable!();
    };
    assert!(matches!(
        &section.controls[0].widget,
        Widget::NumberInput { value } if value == "32"
    ));
    assert!(matches!(
        &section.controls[1].widget,
        Widget::TextInput { value } if value == "i7"
    ));
}

#[test]
fn submission_while_loading_is_rejected() {
    let mut controller = EquipmentFormController::new();
    let _ticket = controller.select_type("Laptop");

    let result = controller.submission(&FieldSet::empty());
    assert!(matches!(
        result,
        Err(AppError::Validation(message)) if message == DYNAMIC_FIELDS_LOADING_MESSAGE
    ));
}

#[test]
fn submission_drops_values_outside_current_schema() {
    let mut controller = EquipmentFormController::new();
    let ticket = controller
        .edit_record(&json!({
            "tipo": "Switch",
            DYNAMIC_FIELDS_KEY: {"RAM": 16, "Puertos": 48}
        }))
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());
    controller.complete_fetch(ticket, Ok(field_set(&[("Puertos", FieldKind::Number)])));

    let payload = controller
        .submission(&FieldSet::empty())
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(payload[DYNAMIC_FIELDS_KEY], json!({"Puertos": 48.0}));
}

#[test]
fn type_attribute_is_changed_only_through_select_type() {
    let mut controller = EquipmentFormController::new();

    assert!(controller.set_attribute("tipo", json!("Laptop")).is_err());
    assert!(controller.set_attribute("nombre", json!("PC-02")).is_ok());
    assert_eq!(controller.form().attributes().get("nombre"), Some(&json!("PC-02")));
}

#[test]
fn unknown_dynamic_field_is_not_found() {
    let mut controller = EquipmentFormController::new();
    let ticket = controller
        .select_type("Switch")
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());
    controller.complete_fetch(ticket, Ok(field_set(&[("Puertos", FieldKind::Number)])));

    let result = controller.apply_dynamic_input("RAM", ControlInput::Text("8".to_owned()));
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
