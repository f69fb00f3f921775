use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::helius::FetchError;

/// Failure of a single wallet analysis. Each kind maps to its own
/// user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("no transaction data for wallet {0}")]
    NoData(String),

    #[error("failed to fetch wallet transactions: {0}")]
    Fetch(#[from] FetchError),
}

impl AnalysisError {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidAddress(_) => "invalid_address",
            AnalysisError::NoData(_) => "no_data",
            AnalysisError::Fetch(_) => "fetch_failure",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::InvalidAddress(_) => {
                "Invalid wallet address format. Please try again."
            }
            AnalysisError::NoData(_) => "No data found for this wallet. Please try again.",
            AnalysisError::Fetch(_) => {
                "An error occurred while fetching wallet data. Please try again."
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Unauthorized")]
    Unauthorized,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Analysis(e) => {
                let status = match e {
                    AnalysisError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
                    AnalysisError::NoData(_) => StatusCode::NOT_FOUND,
                    AnalysisError::Fetch(fetch) => {
                        tracing::warn!(error = %fetch, "Upstream fetch failed");
                        StatusCode::BAD_GATEWAY
                    }
                };
                (status, e.user_message().to_string())
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_kind_has_distinct_message() {
        let errors = [
            AnalysisError::InvalidAddress("x".into()),
            AnalysisError::NoData("x".into()),
            AnalysisError::Fetch(FetchError::Timeout),
        ];

        let kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["invalid_address", "no_data", "fetch_failure"]);

        let messages: std::collections::HashSet<_> =
            errors.iter().map(|e| e.user_message()).collect();
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn test_status_mapping() {
        let resp = AppError::from(AnalysisError::InvalidAddress("x".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(AnalysisError::NoData("x".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::from(AnalysisError::Fetch(FetchError::RateLimited)).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        assert_eq!(AppError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
