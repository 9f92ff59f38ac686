//! Route handlers.

use super::{ApiError, AppState};
use crate::report::ScanReport;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use dfs_core::{
    check_admin_coverage, has_feature_access, profiles_from_value, CoverageIssue, Grant,
    PermissionMatrix, PortalSettings, Role, RoleCapabilities, UpdatePatch, ValidationIssue,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Body may be any JSON; only an array is read as profiles.
pub async fn scan(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ScanReport>, ApiError> {
    let Json(body) = body?;
    let profiles = profiles_from_value(&body);
    let report = ScanReport::new(state.scanner.scan(&profiles));
    debug!(
        "Scanned {} profiles: {} issue(s)",
        profiles.len(),
        report.summary.total
    );
    Ok(Json(report))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CoverageResponse {
    pub issues: Vec<CoverageIssue>,
}

pub async fn coverage(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CoverageResponse>, ApiError> {
    let Json(body) = body?;
    let profiles = profiles_from_value(&body);
    Ok(Json(CoverageResponse {
        issues: check_admin_coverage(&profiles),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessRequest {
    #[serde(default)]
    pub role: Option<String>,
    pub feature: String,
    pub action: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessResponse {
    pub allowed: bool,
}

/// Default-deny lookup; unknown names are not errors here.
pub async fn access(
    request: Result<Json<AccessRequest>, JsonRejection>,
) -> Result<Json<AccessResponse>, ApiError> {
    let Json(request) = request?;
    Ok(Json(AccessResponse {
        allowed: has_feature_access(request.role.as_deref(), &request.feature, &request.action),
    }))
}

pub async fn capabilities(Path(role): Path<String>) -> Json<RoleCapabilities> {
    Json(RoleCapabilities::for_raw_role(Some(&role)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatrixResponse {
    pub role: Role,
    pub grants: Vec<Grant>,
}

pub async fn matrix(Path(role): Path<String>) -> Result<Json<MatrixResponse>, ApiError> {
    let role: Role = role.parse()?;
    Ok(Json(MatrixResponse {
        role,
        grants: PermissionMatrix::global().grants(role),
    }))
}

pub async fn autofix(
    State(state): State<AppState>,
    issue: Result<Json<ValidationIssue>, JsonRejection>,
) -> Result<Json<UpdatePatch>, ApiError> {
    let Json(issue) = issue?;
    let patch = state.scanner.auto_fix(&issue)?;
    Ok(Json(patch))
}

pub async fn settings(State(state): State<AppState>) -> Json<PortalSettings> {
    Json(*state.settings())
}
