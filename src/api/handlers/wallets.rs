use axum::extract::{Path, State};
use axum::Json;

use super::ApiResponse;
use crate::errors::AppError;
use crate::models::WalletReport;
use crate::AppState;

/// `GET /api/wallets/:address/win-rate`
pub async fn win_rate(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<WalletReport>>, AppError> {
    let report = state.analyzer.analyze_wallet(&address).await?;
    Ok(Json(ApiResponse::ok(report)))
}
