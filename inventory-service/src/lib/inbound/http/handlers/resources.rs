use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::inventory::kinds::ResourceKind;
use crate::inventory::kinds::OSDISTRO;
use crate::inventory::kinds::OSIMAGE;
use crate::inventory::models::ResourceName;

/// Binds a route family to the resource kind it serves.
pub trait KindRoute: Send + Sync + 'static {
    fn kind() -> &'static ResourceKind;
}

pub struct OsImages;

impl KindRoute for OsImages {
    fn kind() -> &'static ResourceKind {
        &OSIMAGE
    }
}

pub struct Distros;

impl KindRoute for Distros {
    fn kind() -> &'static ResourceKind {
        &OSDISTRO
    }
}

pub async fn list_resources<K: KindRoute>(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<Value>>, ApiError> {
    let resources = state.inventory_service.list(K::kind()).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        resources.iter().map(|r| r.to_payload()).collect(),
    ))
}

pub async fn get_resource<K: KindRoute>(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<ApiSuccess<Value>, ApiError> {
    let name = ResourceName::new(name)?;

    state
        .inventory_service
        .get(K::kind(), &name)
        .await
        .map_err(ApiError::from)
        .map(|resource| ApiSuccess::new(StatusCode::OK, resource.to_payload()))
}

pub async fn create_resource<K: KindRoute>(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<ApiSuccess<Value>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let resource = state.inventory_service.create(K::kind(), payload).await?;

    Ok(ApiSuccess::new(StatusCode::CREATED, resource.to_payload()))
}

pub async fn replace_resource<K: KindRoute>(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<ApiSuccess<Value>, ApiError> {
    let name = ResourceName::new(name)?;
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let resource = state
        .inventory_service
        .replace(K::kind(), &name, payload)
        .await?;

    Ok(ApiSuccess::new(StatusCode::CREATED, resource.to_payload()))
}

pub async fn patch_resource<K: KindRoute>(
    State(state): State<AppState>,
    Path(name): Path<String>,
    patch: Result<Json<Value>, JsonRejection>,
) -> Result<ApiSuccess<Value>, ApiError> {
    let name = ResourceName::new(name)?;
    let Json(patch) = patch.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let resource = state
        .inventory_service
        .patch(K::kind(), &name, patch)
        .await?;

    Ok(ApiSuccess::new(StatusCode::CREATED, resource.to_payload()))
}

pub async fn delete_resource<K: KindRoute>(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let name = ResourceName::new(name)?;

    state.inventory_service.delete(K::kind(), &name).await?;

    Ok(ApiSuccess::new(StatusCode::OK, ()))
}
