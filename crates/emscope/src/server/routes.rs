//! Route handlers.

use super::{ApiError, ApiResult, AppState};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use emscope_client::OemEndpoint;
use emscope_mapping::{auto_map_system, prepare_targets};
use emscope_protocol::{TaggedTarget, TargetProperties, TargetType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/endpoints", get(list_endpoints))
        .route("/api/targets/cache-info", get(cache_info))
        .route("/api/targets/refresh", post(refresh_targets))
        .route("/api/targets/search", get(search_targets))
        .route("/api/targets/properties", get(target_properties))
        .route("/api/targets/auto-map", post(auto_map))
        .route("/api/targets/prepare", post(prepare))
        .route("/api/config/targets", get(load_config).post(save_config))
}

// ----------------------------------------------------------------------
// Request/response shapes
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EndpointQuery {
    #[serde(rename = "endpointName")]
    endpoint_name: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(rename = "endpointName")]
    endpoint_name: String,
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    types: Option<String>,
    #[serde(default)]
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PropertiesQuery {
    #[serde(rename = "endpointName")]
    endpoint_name: String,
    #[serde(rename = "targetId")]
    target_id: String,
}

#[derive(Debug, Deserialize)]
struct AutoMapRequest {
    #[serde(rename = "endpointName")]
    endpoint_name: String,
    #[serde(rename = "rootName")]
    root_name: String,
    #[serde(rename = "rootType")]
    root_type: TargetType,
}

#[derive(Debug, Deserialize)]
struct TargetsRequest {
    #[serde(rename = "endpointName")]
    endpoint_name: String,
    #[serde(default)]
    targets: Vec<TaggedTarget>,
}

/// Endpoint listing entry with credentials redacted.
#[derive(Debug, Serialize)]
struct EndpointSummary {
    site: Option<String>,
    endpoint: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct CacheInfo {
    count: i64,
    #[serde(rename = "lastRefresh")]
    last_refresh: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefreshResponse {
    count: usize,
}

#[derive(Debug, Serialize)]
struct TargetsResponse {
    targets: Vec<TaggedTarget>,
}

// ----------------------------------------------------------------------
// Handlers
// ----------------------------------------------------------------------

fn require_endpoint(state: &AppState, name: &str) -> ApiResult<OemEndpoint> {
    state
        .store
        .endpoint_by_name(name)?
        .ok_or_else(|| ApiError::not_found(format!("Unknown endpoint: {}", name)))
}

async fn list_endpoints(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<EndpointSummary>>> {
    let endpoints = state
        .store
        .load_endpoints()?
        .into_iter()
        .map(|e| EndpointSummary {
            site: e.site,
            endpoint: e.endpoint,
            name: e.name,
        })
        .collect();
    Ok(Json(endpoints))
}

async fn cache_info(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EndpointQuery>,
) -> ApiResult<Json<CacheInfo>> {
    Ok(Json(CacheInfo {
        count: state.db.count_targets(&query.endpoint_name).await?,
        last_refresh: state.db.last_refresh(&query.endpoint_name).await?,
    }))
}

async fn refresh_targets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EndpointQuery>,
) -> ApiResult<Json<RefreshResponse>> {
    let endpoint = require_endpoint(&state, &query.endpoint_name)?;
    let client = state.pool.get(&endpoint)?;

    let targets = client.all_targets().await?;
    let count = state
        .db
        .replace_targets(&query.endpoint_name, &targets)
        .await?;

    info!(endpoint = %query.endpoint_name, count, "catalog refreshed");
    Ok(Json(RefreshResponse { count }))
}

async fn search_targets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<emscope_protocol::Target>>> {
    let type_filters: Option<Vec<String>> = query.types.as_deref().map(|types| {
        types
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    });

    let results = state
        .db
        .search_targets(
            &query.endpoint_name,
            query.q.as_deref().unwrap_or(""),
            type_filters.as_deref(),
            query.limit.unwrap_or(50),
        )
        .await?;
    Ok(Json(results))
}

async fn target_properties(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PropertiesQuery>,
) -> ApiResult<Json<TargetProperties>> {
    let endpoint = require_endpoint(&state, &query.endpoint_name)?;
    let client = state.pool.get(&endpoint)?;
    Ok(Json(client.properties(&query.target_id).await?))
}

async fn auto_map(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AutoMapRequest>,
) -> ApiResult<Json<TargetsResponse>> {
    let endpoint = require_endpoint(&state, &request.endpoint_name)?;

    let catalog = state.db.all_targets(&request.endpoint_name).await?;
    let root_exists = catalog
        .iter()
        .any(|t| t.name == request.root_name && t.type_name == request.root_type);
    if !root_exists {
        return Err(ApiError::not_found(format!(
            "Root target not in cached catalog: {}",
            request.root_name
        )));
    }

    let client = state.pool.get(&endpoint)?;
    let targets = auto_map_system(
        &catalog,
        &request.root_name,
        &request.root_type,
        client.as_ref(),
    )
    .await;
    Ok(Json(TargetsResponse { targets }))
}

async fn prepare(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TargetsRequest>,
) -> ApiResult<Json<TargetsResponse>> {
    let endpoint = require_endpoint(&state, &request.endpoint_name)?;

    let catalog = state.db.all_targets(&request.endpoint_name).await?;
    let client = state.pool.get(&endpoint)?;
    let targets = prepare_targets(&catalog, request.targets, client.as_ref()).await;
    Ok(Json(TargetsResponse { targets }))
}

async fn load_config(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EndpointQuery>,
) -> ApiResult<Json<crate::storage::SiteConfig>> {
    if let Some(site) = state.store.site_config(&query.endpoint_name)? {
        return Ok(Json(site));
    }
    // No saved config yet: answer with an empty shell for this endpoint.
    let endpoint = state.store.endpoint_by_name(&query.endpoint_name)?;
    Ok(Json(crate::storage::SiteConfig {
        site: endpoint.as_ref().and_then(|e| e.site.clone()),
        endpoint: endpoint.map(|e| e.endpoint),
        name: query.endpoint_name,
        targets: Vec::new(),
    }))
}

async fn save_config(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TargetsRequest>,
) -> ApiResult<Json<crate::storage::SiteConfig>> {
    require_endpoint(&state, &request.endpoint_name)?;
    let site = state
        .store
        .upsert_site_config(&request.endpoint_name, request.targets)?;
    info!(endpoint = %request.endpoint_name, targets = site.targets.len(), "site config saved");
    Ok(Json(site))
}
