//! Unified error types for the electoral API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Unified error type for the electoral API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Emol feed error.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// Electoral computation error.
    #[error("election error: {0}")]
    Election(#[from] ElectionError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors talking to the Emol feeds and the poll API.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Upstream responded with a non-success status.
    #[error("failed to fetch {url}: {reason}")]
    FetchFailed {
        /// The feed URL that failed.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to parse feed data.
    #[error("failed to parse feed data: {0}")]
    ParseError(String),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Domain errors in the electoral computation.
#[derive(Error, Debug)]
pub enum ElectionError {
    /// The roster feed has no rows for the requested district.
    #[error("no se encontraron datos para distrito {distrito}")]
    DistrictNotFound {
        /// The district that came up empty.
        distrito: String,
    },

    /// The district input could not be resolved to 1..=28.
    #[error("distrito inválido: {0}")]
    InvalidDistrict(String),

    /// Two poll entries resolved to the same candidate.
    #[error("duplicate poll match: candidate {candidate} matched twice")]
    DuplicateMatch {
        /// The candidate matched more than once.
        candidate: String,
    },
}

/// JSON body returned for failed requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Election(
                ElectionError::DistrictNotFound { .. } | ElectionError::InvalidDistrict(_),
            ) => StatusCode::NOT_FOUND,
            ApiError::Feed(_) | ApiError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_not_found_maps_to_404() {
        let err = ApiError::from(ElectionError::DistrictNotFound {
            distrito: "99".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn feed_error_maps_to_502() {
        let err = ApiError::from(FeedError::FetchFailed {
            url: "https://example.com/dip.csv".to_string(),
            reason: "HTTP 503".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn district_not_found_message_is_spanish() {
        let err = ElectionError::DistrictNotFound {
            distrito: "31".to_string(),
        };
        assert_eq!(err.to_string(), "no se encontraron datos para distrito 31");
    }
}
