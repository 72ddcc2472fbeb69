//! OpenAPI document served by the Swagger UI at `/docs`.

use utoipa::OpenApi;

/// OpenAPI description of the electoral API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Electoral - D'Hondt",
        description = "Backend para cálculos electorales con método D'Hondt",
        version = "1.0"
    ),
    paths(
        crate::api::handlers::saludo,
        crate::api::handlers::health,
        crate::api::handlers::emol,
        crate::api::handlers::dhondt,
        crate::api::handlers::dhondt_post,
        crate::api::handlers::resumen,
        crate::api::handlers::encuestas,
        crate::api::handlers::resultado,
        crate::api::handlers::distritos,
        crate::api::handlers::candidatos,
    ),
    components(schemas(
        crate::api::handlers::SaludoResponse,
        crate::api::handlers::HealthResponse,
        crate::api::handlers::DistritoRequest,
        crate::election::pactos::PactInfo,
        crate::election::types::AllocationLevel,
        crate::election::types::Candidate,
        crate::election::types::CandidateRoster,
        crate::election::types::CandidateSummary,
        crate::election::types::DhondtResult,
        crate::election::types::District,
        crate::election::types::DistrictRoster,
        crate::election::types::ElectedCandidate,
        crate::election::types::NationalCandidate,
        crate::election::types::NationalSummary,
        crate::election::types::Pact,
        crate::election::types::PactResult,
        crate::election::types::PactTable,
        crate::election::types::PactTableRow,
        crate::election::types::PactTotals,
        crate::election::types::Party,
        crate::election::types::PartyTotals,
        crate::election::types::RosterCandidate,
        crate::emol::types::PollEntry,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for route in [
            "/api/saludo",
            "/api/health",
            "/api/emol/{distrito}",
            "/api/dhondt/{distrito}",
            "/api/dhondt",
            "/api/resumen",
            "/api/encuestas",
            "/api/resultado/{distrito}",
            "/api/distritos",
            "/api/candidatos",
        ] {
            assert!(paths.contains_key(route), "missing route {route}");
        }
    }
}
