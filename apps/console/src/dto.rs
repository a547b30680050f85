pub mod fields;
pub mod forms;
pub mod records;

use itsm_application::UserNotice;
use serde::Serialize;
use ts_rs::TS;

pub use fields::{FieldSetResponse, ReplaceFieldsRequest, SaveFieldRequest};
pub use forms::{FieldSectionResponse, RenderFormRequest, RenderFormResponse};
pub use records::{SubmitRecordRequest, SubmitRecordResponse};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Notice shown to the console user after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/notice-response.ts"
)]
pub struct NoticeResponse {
    pub level: String,
    pub message: String,
}

impl From<UserNotice> for NoticeResponse {
    fn from(value: UserNotice) -> Self {
        Self {
            level: value.level.as_str().to_owned(),
            message: value.message,
        }
    }
}
