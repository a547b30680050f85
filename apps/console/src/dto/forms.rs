use itsm_domain::{FieldControl, FieldSection, Widget};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Incoming payload for rendering the custom-field areas of a form.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/render-form-request.ts"
)]
pub struct RenderFormRequest {
    /// Stored record being edited; absent for a new record.
    #[ts(type = "Record<string, unknown> | null")]
    #[serde(default)]
    pub record: Option<Value>,
    /// Newly selected equipment type. Clears stored type-indexed values.
    #[serde(default)]
    pub equipment_type: Option<String>,
}

/// Rendered custom-field areas of a form.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/render-form-response.ts"
)]
pub struct RenderFormResponse {
    pub custom_section: Option<FieldSectionResponse>,
    pub dynamic_section: Option<FieldSectionResponse>,
}

/// API representation of a titled group of controls.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/field-section.ts"
)]
pub struct FieldSectionResponse {
    pub namespace: String,
    pub title: String,
    pub controls: Vec<FieldControlResponse>,
}

impl From<FieldSection> for FieldSectionResponse {
    fn from(value: FieldSection) -> Self {
        Self {
            namespace: value.namespace.id_prefix().to_owned(),
            title: value.title,
            controls: value
                .controls
                .into_iter()
                .map(FieldControlResponse::from)
                .collect(),
        }
    }
}

/// API representation of one rendered control.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/field-control.ts"
)]
pub struct FieldControlResponse {
    pub id: String,
    pub field_name: String,
    pub label: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub widget: WidgetResponse,
}

impl From<FieldControl> for FieldControlResponse {
    fn from(value: FieldControl) -> Self {
        Self {
            id: value.id,
            field_name: value.field_name,
            label: value.label,
            required: value.required,
            placeholder: value.placeholder,
            widget: WidgetResponse::from(value.widget),
        }
    }
}

/// API representation of a control's widget state.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "control", rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/widget.ts"
)]
pub enum WidgetResponse {
    TextInput {
        value: String,
    },
    NumberInput {
        value: String,
    },
    DateInput {
        value: String,
    },
    Select {
        options: Vec<String>,
        selected: Option<String>,
        placeholder: String,
    },
    Checkbox {
        checked: bool,
    },
}

impl From<Widget> for WidgetResponse {
    fn from(value: Widget) -> Self {
        match value {
            Widget::TextInput { value } => Self::TextInput { value },
            Widget::NumberInput { value } => Self::NumberInput { value },
            Widget::DateInput { value } => Self::DateInput { value },
            Widget::Select {
                options,
                selected,
                placeholder,
            } => Self::Select {
                options,
                selected,
                placeholder,
            },
            Widget::Checkbox { checked } => Self::Checkbox { checked },
        }
    }
}
