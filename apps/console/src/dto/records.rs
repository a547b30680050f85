use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use super::NoticeResponse;

/// Incoming payload for saving a record form.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/submit-record-request.ts"
)]
pub struct SubmitRecordRequest {
    /// Identifier of the record being edited; absent to create one.
    #[serde(default)]
    pub record_id: Option<String>,
    /// Record attributes plus the `campos_personalizados` and `campos_dinamicos` bags.
    #[ts(type = "Record<string, unknown>")]
    pub data: Value,
}

/// Saved record payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/submit-record-response.ts"
)]
pub struct SubmitRecordResponse {
    #[ts(type = "Record<string, unknown>")]
    pub record: Value,
    pub notice: NoticeResponse,
}
