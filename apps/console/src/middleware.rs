use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use itsm_core::{AccessToken, AppError};

use crate::error::ApiResult;

/// Requires a bearer token and forwards it to handlers as an extension.
pub async fn require_bearer_token(mut request: Request, next: Next) -> ApiResult<Response> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("No autorizado".to_owned()))?;
    let token = AccessToken::from_authorization_header(header_value)?;

    request.extensions_mut().insert(token);
    Ok(next.run(request).await)
}
