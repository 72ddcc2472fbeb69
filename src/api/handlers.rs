//! HTTP API handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::election::types::{
    DhondtResult, District, DistrictRoster, NationalCandidate, NationalSummary, PactTable,
};
use crate::election::ElectoralService;
use crate::emol::PollEntry;
use crate::error::ApiError;

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Electoral service with the poll snapshot and the feed client.
    pub service: Arc<ElectoralService>,
}

/// Greeting response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaludoResponse {
    /// Greeting message.
    pub mensaje: &'static str,
    /// Outcome marker: "success".
    pub status: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "healthy".
    pub status: &'static str,
    /// Human-readable status message.
    pub message: &'static str,
}

/// Request body for `POST /api/dhondt`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DistritoRequest {
    /// District number (1-28). Accepts "10" or "D10".
    #[serde(default = "default_distrito")]
    pub distrito: String,
}

fn default_distrito() -> String {
    "10".to_string()
}

/// Greeting handler - static payload.
#[utoipa::path(
    get,
    path = "/api/saludo",
    tag = "sistema",
    responses((status = 200, description = "Mensaje de saludo", body = SaludoResponse))
)]
pub async fn saludo() -> impl IntoResponse {
    Json(SaludoResponse {
        mensaje: "Hola Mundo",
        status: "success",
    })
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "sistema",
    responses((status = 200, description = "Estado del servicio", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        message: "API funcionando correctamente",
    })
}

/// District roster with poll votes assigned.
#[utoipa::path(
    get,
    path = "/api/emol/{distrito}",
    tag = "electoral",
    params(("distrito" = String, Path, description = "Número del distrito (1-28). Ej: 10")),
    responses(
        (status = 200, description = "Candidatos del distrito con votos de encuesta", body = DistrictRoster),
        (status = 404, description = "Distrito no encontrado"),
        (status = 502, description = "Feed no disponible")
    )
)]
pub async fn emol(
    State(state): State<AppState>,
    Path(distrito): Path<String>,
) -> Result<Json<DistrictRoster>, ApiError> {
    Ok(Json(state.service.district_roster(&distrito).await?))
}

/// Full D'Hondt computation for a district.
#[utoipa::path(
    get,
    path = "/api/dhondt/{distrito}",
    tag = "electoral",
    params(("distrito" = String, Path, description = "Número del distrito (1-28). Ej: 10, D10, d10")),
    responses(
        (status = 200, description = "Cálculo completado", body = DhondtResult),
        (status = 404, description = "Distrito no encontrado"),
        (status = 502, description = "Feed no disponible")
    )
)]
pub async fn dhondt(
    State(state): State<AppState>,
    Path(distrito): Path<String>,
) -> Result<Json<DhondtResult>, ApiError> {
    Ok(Json(state.service.compute_dhondt(&distrito).await?))
}

/// D'Hondt computation with the district in the request body.
#[utoipa::path(
    post,
    path = "/api/dhondt",
    tag = "electoral",
    request_body = DistritoRequest,
    responses(
        (status = 200, description = "Cálculo completado", body = DhondtResult),
        (status = 404, description = "Distrito no encontrado"),
        (status = 502, description = "Feed no disponible")
    )
)]
pub async fn dhondt_post(
    State(state): State<AppState>,
    Json(request): Json<DistritoRequest>,
) -> Result<Json<DhondtResult>, ApiError> {
    Ok(Json(state.service.compute_dhondt(&request.distrito).await?))
}

/// National summary aggregating all districts.
#[utoipa::path(
    get,
    path = "/api/resumen",
    tag = "electoral",
    responses((status = 200, description = "Resumen nacional", body = NationalSummary))
)]
pub async fn resumen(
    State(state): State<AppState>,
) -> Result<Json<NationalSummary>, ApiError> {
    Ok(Json(state.service.national_summary().await?))
}

/// The poll snapshot loaded at startup, keyed "D1".."D28".
#[utoipa::path(
    get,
    path = "/api/encuestas",
    tag = "electoral",
    responses((status = 200, description = "Encuestas disponibles"))
)]
pub async fn encuestas(State(state): State<AppState>) -> Json<HashMap<String, Vec<PollEntry>>> {
    Json(state.service.polls().clone())
}

/// Per-pact results table for a district.
#[utoipa::path(
    get,
    path = "/api/resultado/{distrito}",
    tag = "electoral",
    params(("distrito" = String, Path, description = "Número del distrito (1-28). Ej: 10")),
    responses(
        (status = 200, description = "Resultado formateado por pacto", body = PactTable),
        (status = 404, description = "Distrito no encontrado"),
        (status = 502, description = "Feed no disponible")
    )
)]
pub async fn resultado(
    State(state): State<AppState>,
    Path(distrito): Path<String>,
) -> Result<Json<PactTable>, ApiError> {
    Ok(Json(state.service.pact_table(&distrito).await?))
}

/// List of all electoral districts.
#[utoipa::path(
    get,
    path = "/api/distritos",
    tag = "electoral",
    responses((status = 200, description = "Lista de distritos", body = [District]))
)]
pub async fn distritos(State(state): State<AppState>) -> Json<Vec<District>> {
    Json(state.service.districts().await)
}

/// All candidates nationwide that carry poll votes.
#[utoipa::path(
    get,
    path = "/api/candidatos",
    tag = "electoral",
    responses((status = 200, description = "Lista de candidatos", body = [NationalCandidate]))
)]
pub async fn candidatos(
    State(state): State<AppState>,
) -> Result<Json<Vec<NationalCandidate>>, ApiError> {
    Ok(Json(state.service.national_candidates().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saludo_payload_is_bit_exact() {
        let body = serde_json::to_string(&SaludoResponse {
            mensaje: "Hola Mundo",
            status: "success",
        })
        .unwrap();
        assert_eq!(body, r#"{"mensaje":"Hola Mundo","status":"success"}"#);
    }

    #[test]
    fn health_payload_is_bit_exact() {
        let body = serde_json::to_string(&HealthResponse {
            status: "healthy",
            message: "API funcionando correctamente",
        })
        .unwrap();
        assert_eq!(
            body,
            r#"{"status":"healthy","message":"API funcionando correctamente"}"#
        );
    }

    #[test]
    fn distrito_request_defaults_to_district_10() {
        let request: DistritoRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.distrito, "10");

        let request: DistritoRequest = serde_json::from_str(r#"{"distrito": "D7"}"#).unwrap();
        assert_eq!(request.distrito, "D7");
    }
}
