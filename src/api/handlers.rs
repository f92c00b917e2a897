use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::SandboxError;
use crate::logic::{endpoint_is_visible, SandboxPlayer};
use crate::model::{
    parse_requirements, ApiResponse, Endpoint, EndpointDetail, ExampleSchema, Id, PlayRequest,
    RequirementClass, ResolvedResponse,
};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Header carrying which rule produced a sandbox response
pub const RESOLUTION_HEADER: &str = "x-sandbox-resolution";

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(ApiResponse::failure(status.as_u16(), message)))
}

// Engine errors are logged by the engine itself
fn engine_error(e: SandboxError) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
}

fn store_error(e: anyhow::Error) -> ApiError {
    log::error!("Example store failure: {:#}", e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, &format!("{:#}", e))
}

/// Play a simulated request against a documented endpoint
pub async fn play_api<S: Store>(
    State(store): State<AppState<S>>,
    RequestJson(request): RequestJson<PlayRequest>,
) -> Result<
    (
        StatusCode,
        [(&'static str, String); 1],
        Json<ApiResponse<ResolvedResponse>>,
    ),
    ApiError,
> {
    let resolution = SandboxPlayer::play(&*store, &request)
        .await
        .map_err(engine_error)?;

    Ok((
        StatusCode::OK,
        [(RESOLUTION_HEADER, resolution.source.label())],
        Json(ApiResponse::ok(resolution.envelope)),
    ))
}

async fn load_visible_endpoint<S: Store>(store: &S, endpoint_id: Id) -> Result<Endpoint, ApiError> {
    let endpoint = match store.get_endpoint(endpoint_id).await {
        Ok(Some(endpoint)) => endpoint,
        Ok(None) => return Err(api_error(StatusCode::NOT_FOUND, "Endpoint not found")),
        Err(e) => return Err(store_error(e)),
    };

    match endpoint_is_visible(store, &endpoint).await {
        Ok(true) => Ok(endpoint),
        Ok(false) => Err(api_error(StatusCode::NOT_FOUND, "Endpoint not found")),
        Err(e) => Err(store_error(e)),
    }
}

/// Endpoint details with decoded requirement lists
pub async fn get_endpoint<S: Store>(
    State(store): State<AppState<S>>,
    Path(endpoint_id): Path<Id>,
) -> Result<Json<ApiResponse<EndpointDetail>>, ApiError> {
    let endpoint = load_visible_endpoint(&*store, endpoint_id).await?;

    let decode = |class: RequirementClass| {
        parse_requirements(endpoint.raw_requirements(class))
            .map_err(|source| {
                let e = SandboxError::MalformedRequirements { class, source };
                log::error!("Endpoint {} has {}", endpoint_id, e);
                engine_error(e)
            })
    };
    let path_params = decode(RequirementClass::Path)?;
    let header_param = decode(RequirementClass::Header)?;

    Ok(Json(ApiResponse::ok(EndpointDetail {
        id: endpoint.id,
        proxy_id: endpoint.proxy_id,
        name: endpoint.name,
        method: endpoint.method,
        path: endpoint.path,
        path_params,
        header_param,
    })))
}

/// The latest recorded example for each status code of an endpoint
pub async fn list_endpoint_examples<S: Store>(
    State(store): State<AppState<S>>,
    Path(endpoint_id): Path<Id>,
) -> Result<Json<ApiResponse<Vec<ExampleSchema>>>, ApiError> {
    let endpoint = load_visible_endpoint(&*store, endpoint_id).await?;

    match store.list_latest_schemas_by_status(endpoint.id).await {
        Ok(schemas) => Ok(Json(ApiResponse::ok(schemas))),
        Err(e) => Err(store_error(e)),
    }
}
