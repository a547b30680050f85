use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use itsm_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/console/fields/{entity_type}",
            get(handlers::fields::list_fields_handler).put(handlers::fields::replace_fields_handler),
        )
        .route(
            "/console/fields/{entity_type}/items",
            post(handlers::fields::save_field_handler),
        )
        .route(
            "/console/fields/{entity_type}/items/{index}",
            delete(handlers::fields::remove_field_handler),
        )
        .route(
            "/console/equipment-types/{equipment_type}/fields",
            get(handlers::equipment_types::list_equipment_type_fields_handler)
                .put(handlers::equipment_types::replace_equipment_type_fields_handler),
        )
        .route(
            "/console/forms/{entity_type}/render",
            post(handlers::forms::render_form_handler),
        )
        .route(
            "/console/records/{entity_type}",
            post(handlers::records::submit_record_handler),
        )
        .route_layer(from_fn(middleware::require_bearer_token));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}
