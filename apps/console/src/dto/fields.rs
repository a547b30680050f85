use std::str::FromStr;

use itsm_core::AppError;
use itsm_domain::{FieldDescriptor, FieldDescriptorInput, FieldKind, FieldSet};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::NoticeResponse;

/// API representation of a field descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/field-descriptor.ts"
)]
pub struct FieldDescriptorDto {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&FieldDescriptor> for FieldDescriptorDto {
    fn from(value: &FieldDescriptor) -> Self {
        Self {
            name: value.name().to_owned(),
            field_type: value.kind().as_str().to_owned(),
            required: value.is_required(),
            options: value.options().to_vec(),
            description: value.description().map(str::to_owned),
        }
    }
}

impl TryFrom<FieldDescriptorDto> for FieldDescriptor {
    type Error = AppError;

    fn try_from(value: FieldDescriptorDto) -> Result<Self, Self::Error> {
        Self::new(FieldDescriptorInput {
            name: value.name,
            kind: FieldKind::from_str(value.field_type.as_str())?,
            required: value.required,
            options: value.options,
            description: value.description,
        })
    }
}

/// Field set returned by the configuration endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/field-set-response.ts"
)]
pub struct FieldSetResponse {
    pub fields: Vec<FieldDescriptorDto>,
    #[ts(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeResponse>,
}

impl FieldSetResponse {
    pub fn new(field_set: &FieldSet, notice: Option<NoticeResponse>) -> Self {
        Self {
            fields: field_set.iter().map(FieldDescriptorDto::from).collect(),
            notice,
        }
    }
}

/// Incoming payload replacing a whole field set.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/replace-fields-request.ts"
)]
pub struct ReplaceFieldsRequest {
    pub fields: Vec<FieldDescriptorDto>,
}

/// Incoming payload adding a field or editing the one at `editing_index`.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/save-field-request.ts"
)]
pub struct SaveFieldRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    /// Comma-separated options as typed in the configuration form.
    #[serde(default)]
    pub options_text: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub editing_index: Option<usize>,
}

impl SaveFieldRequest {
    pub fn into_input(self) -> Result<(FieldDescriptorInput, Option<usize>), AppError> {
        let input = FieldDescriptorInput {
            name: self.name,
            kind: FieldKind::from_str(self.field_type.as_str())?,
            required: self.required,
            options: FieldDescriptor::parse_options(self.options_text.as_str()),
            description: self.description,
        };

        Ok((input, self.editing_index))
    }
}
