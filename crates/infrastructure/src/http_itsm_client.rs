use std::time::Duration;

use async_trait::async_trait;
use itsm_application::{EntityFieldSchemaRepository, EquipmentTypeFieldSchemaRepository, RecordGateway};
use itsm_core::{AccessToken, AppError, AppResult};
use itsm_domain::{EntityType, EquipmentType, FieldDescriptor, FieldSet};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error_detail::extract_error_detail;


const UNREACHABLE_MESSAGE: &str = "No se pudo conectar con el servicio ITSM";

#[derive(Debug, Serialize)]
struct EquipmentTypeFieldsRequest<'a> {
    fields: &'a FieldSet,
}

#[derive(Debug, Deserialize)]
struct EquipmentTypeFieldsResponse {
    #[serde(default)]
    fields: Value,
}

/// REST client for the ITSM configuration and record endpoints.
///
/// Every request carries the caller's bearer token. Requests are sent once;
/// failures are mapped to [`AppError`] and returned to the caller.
#[derive(Debug, Clone)]
pub struct HttpItsmClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpItsmClient {
    /// Creates a client with an optional per-request timeout.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder.build().map_err(|error| {
            AppError::Internal(format!("failed to build ITSM HTTP client: {error}"))
        })?;

        Ok(Self::with_client(http_client, base_url))
    }

    /// Creates a client around an existing `reqwest` client.
    #[must_use]
    pub fn with_client(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "ITSM base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        token: &AccessToken,
        operation: &str,
    ) -> AppResult<Response> {
        request
            .header(AUTHORIZATION, token.bearer_header())
            .send()
            .await
            .map_err(|error| {
                warn!(operation, error = %error, "ITSM request failed");
                AppError::Upstream(UNREACHABLE_MESSAGE.to_owned())
            })
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        operation: &str,
    ) -> AppResult<T> {
        response.json::<T>().await.map_err(|error| {
            warn!(operation, error = %error, "invalid ITSM response body");
            AppError::Upstream(format!("invalid ITSM response for {operation}: {error}"))
        })
    }
}

/// Reads a stored descriptor list one entry at a time.
///
/// Entries that no longer validate, and names that collide once trimmed,
/// are skipped with a warning so the rest of the schema stays usable.
fn parse_field_set(fields: &Value, schema: &str) -> AppResult<FieldSet> {
    let entries = match fields {
        Value::Null => return Ok(FieldSet::empty()),
        Value::Array(entries) => entries,
        _ => {
            return Err(AppError::Upstream(format!(
                "invalid field schema for '{schema}': expected a list"
            )));
        }
    };

    let mut field_set = FieldSet::empty();
    for (position, entry) in entries.iter().enumerate() {
        let parsed = serde_json::from_value::<FieldDescriptor>(entry.clone())
            .map_err(|error| AppError::Validation(error.to_string()))
            .and_then(|descriptor| field_set.with_added(descriptor));

        match parsed {
            Ok(extended) => field_set = extended,
            Err(error) => warn!(
                schema,
                position,
                error = %error,
                "skipping invalid stored field descriptor"
            ),
        }
    }

    Ok(field_set)
}

/// Passes successful responses through and maps failures to [`AppError`].
async fn ensure_success(response: Response, operation: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_error_detail(body.as_str());
    warn!(
        operation,
        status = status.as_u16(),
        detail = detail.as_deref().unwrap_or(""),
        "ITSM request rejected"
    );

    Err(match status {
        StatusCode::UNAUTHORIZED => {
            AppError::Unauthorized(detail.unwrap_or_else(|| "No autorizado".to_owned()))
        }
        StatusCode::FORBIDDEN => {
            AppError::Forbidden(detail.unwrap_or_else(|| "Acceso denegado".to_owned()))
        }
        _ => AppError::Upstream(detail.unwrap_or_else(|| {
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("error")
            )
        })),
    })
}

#[async_trait]
impl EntityFieldSchemaRepository for HttpItsmClient {
    async fn fetch_entity_fields(
        &self,
        token: &AccessToken,
        entity_type: EntityType,
    ) -> AppResult<FieldSet> {
        let operation = "fetch_entity_fields";
        let url = self.endpoint(&["configuracion", "campos", entity_type.as_str()])?;
        let response = self.send(self.http_client.get(url), token, operation).await?;
        let response = ensure_success(response, operation).await?;

        let body: Value = Self::read_json(response, operation).await?;
        match body.get(entity_type.fields_key()) {
            None => Ok(FieldSet::empty()),
            Some(fields) => parse_field_set(fields, entity_type.as_str()),
        }
    }

    async fn replace_entity_fields(
        &self,
        token: &AccessToken,
        entity_type: EntityType,
        fields: &FieldSet,
    ) -> AppResult<()> {
        let operation = "replace_entity_fields";
        let url = self.endpoint(&["configuracion", "campos", entity_type.as_str()])?;
        let response = self
            .send(self.http_client.put(url).json(fields), token, operation)
            .await?;
        ensure_success(response, operation).await?;
        Ok(())
    }
}

#[async_trait]
impl EquipmentTypeFieldSchemaRepository for HttpItsmClient {
    async fn fetch_equipment_type_fields(
        &self,
        token: &AccessToken,
        equipment_type: &EquipmentType,
    ) -> AppResult<FieldSet> {
        let operation = "fetch_equipment_type_fields";
        let url = self.endpoint(&["configuracion", "campos-tipo", equipment_type.as_str()])?;
        let response = self.send(self.http_client.get(url), token, operation).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(FieldSet::empty());
        }

        let response = ensure_success(response, operation).await?;
        let body: EquipmentTypeFieldsResponse = Self::read_json(response, operation).await?;
        parse_field_set(&body.fields, equipment_type.as_str())
    }

    async fn replace_equipment_type_fields(
        &self,
        token: &AccessToken,
        equipment_type: &EquipmentType,
        fields: &FieldSet,
    ) -> AppResult<()> {
        let operation = "replace_equipment_type_fields";
        let url = self.endpoint(&["configuracion", "campos-tipo", equipment_type.as_str()])?;
        let request = self
            .http_client
            .put(url)
            .json(&EquipmentTypeFieldsRequest { fields });
        let response = self.send(request, token, operation).await?;
        ensure_success(response, operation).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordGateway for HttpItsmClient {
    async fn create_record(
        &self,
        token: &AccessToken,
        entity_type: EntityType,
        payload: Value,
    ) -> AppResult<Value> {
        let operation = "create_record";
        let url = self.endpoint(&[entity_type.as_str()])?;
        let response = self
            .send(self.http_client.post(url).json(&payload), token, operation)
            .await?;
        let response = ensure_success(response, operation).await?;
        Self::read_json(response, operation).await
    }

    async fn update_record(
        &self,
        token: &AccessToken,
        entity_type: EntityType,
        record_id: &str,
        payload: Value,
    ) -> AppResult<Value> {
        let operation = "update_record";
        let url = self.endpoint(&[entity_type.as_str(), record_id])?;
        let response = self
            .send(self.http_client.put(url).json(&payload), token, operation)
            .await?;
        let response = ensure_success(response, operation).await?;
        Self::read_json(response, operation).await
    }
}
