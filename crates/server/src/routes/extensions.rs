use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use common::types::Success;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::domain::{is_truthy, BlockedExtensions, CustomExtension, FixedExtension};

use crate::errors::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct ToggleFixedBody {
    #[serde(default)]
    pub blocked: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddCustomBody {
    #[serde(default)]
    pub extension: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddCustomResponse {
    pub success: bool,
    pub extension: String,
}

/// A request without a JSON content type reads as an empty body; a JSON body
/// that fails to parse is rejected before anything is saved.
fn json_body<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(b)) => Ok(b),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
    }
}

/// Falsy values count as "not provided"; any other non-string is rejected.
fn extension_input(value: Option<Value>) -> Result<String, ApiError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(v) if is_truthy(&v) => Err(ApiError::bad_request("Invalid extension")),
        _ => Ok(String::new()),
    }
}

#[utoipa::path(get, path = "/api/fixed-extensions", tag = "extensions", responses((status = 200, description = "Fixed extensions sorted by identifier", body = [crate::openapi::FixedExtensionDoc])))]
pub async fn list_fixed(State(state): State<ServerState>) -> Result<Json<Vec<FixedExtension>>, ApiError> {
    Ok(Json(state.extensions.list_fixed().await?))
}

#[utoipa::path(put, path = "/api/fixed-extensions/{extension}", tag = "extensions", params(("extension" = String, Path, description = "Fixed extension identifier")), request_body = crate::openapi::ToggleFixedDoc, responses((status = 200, description = "Updated", body = crate::openapi::SuccessDoc), (status = 404, description = "Extension not found", body = crate::openapi::ErrorDoc)))]
pub async fn toggle_fixed(
    State(state): State<ServerState>,
    Path(extension): Path<String>,
    body: Result<Json<ToggleFixedBody>, JsonRejection>,
) -> Result<Json<Success>, ApiError> {
    let blocked = json_body(body)?.blocked.is_some_and(|v| is_truthy(&v));
    state.extensions.set_fixed_blocked(&extension, blocked).await?;
    Ok(Json(Success::ok()))
}

#[utoipa::path(get, path = "/api/custom-extensions", tag = "extensions", responses((status = 200, description = "Custom extensions, newest first", body = [crate::openapi::CustomExtensionDoc])))]
pub async fn list_custom(State(state): State<ServerState>) -> Result<Json<Vec<CustomExtension>>, ApiError> {
    Ok(Json(state.extensions.list_custom().await?))
}

#[utoipa::path(post, path = "/api/custom-extensions", tag = "extensions", request_body = crate::openapi::AddCustomDoc, responses((status = 200, description = "Added", body = crate::openapi::AddCustomResponseDoc), (status = 400, description = "Invalid, duplicate, fixed collision or list full", body = crate::openapi::ErrorDoc)))]
pub async fn add_custom(
    State(state): State<ServerState>,
    body: Result<Json<AddCustomBody>, JsonRejection>,
) -> Result<Json<AddCustomResponse>, ApiError> {
    let raw = extension_input(json_body(body)?.extension)?;
    let extension = state.extensions.add_custom(&raw).await?;
    Ok(Json(AddCustomResponse { success: true, extension }))
}

#[utoipa::path(delete, path = "/api/custom-extensions/{extension}", tag = "extensions", params(("extension" = String, Path, description = "Custom extension identifier")), responses((status = 200, description = "Deleted", body = crate::openapi::SuccessDoc), (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)))]
pub async fn delete_custom(
    State(state): State<ServerState>,
    Path(extension): Path<String>,
) -> Result<Json<Success>, ApiError> {
    state.extensions.delete_custom(&extension).await?;
    Ok(Json(Success::ok()))
}

#[utoipa::path(get, path = "/api/blocked-extensions", tag = "extensions", responses((status = 200, description = "Blocked fixed and custom extensions", body = crate::openapi::BlockedExtensionsDoc)))]
pub async fn list_blocked(State(state): State<ServerState>) -> Result<Json<BlockedExtensions>, ApiError> {
    Ok(Json(state.extensions.blocked().await?))
}
