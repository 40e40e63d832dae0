//! Forecast analysis handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use runway_core::{import::parse_transactions, Error, ForecastResult, GoalRequest};

use crate::{AppError, AppState, MAX_UPLOAD_SIZE};

/// POST /api/forecast/analyze - Analyze transaction history against a goal
///
/// Expects multipart form with:
/// - file: transaction CSV (required, max 10MB)
/// - goal: GoalRequest JSON (required; structured fields or goalText)
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ForecastResult>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut goal_json: Option<String> = None;
    let mut total_size: usize = 0;

    // Extract fields from multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::bad_request("Failed to read file data"))?;
                total_size += bytes.len();

                if total_size > MAX_UPLOAD_SIZE {
                    return Err(AppError::bad_request(&format!(
                        "File too large. Maximum size is {} MB",
                        MAX_UPLOAD_SIZE / 1024 / 1024
                    )));
                }

                file_data = Some(bytes.to_vec());
            }
            "goal" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Failed to read goal"))?;
                goal_json = Some(value);
            }
            _ => {}
        }
    }

    // Validate required fields
    let file_data = file_data.ok_or_else(|| AppError::bad_request("Missing file field"))?;
    let goal_json = goal_json.ok_or_else(|| AppError::bad_request("Missing goal field"))?;

    let goal: GoalRequest = serde_json::from_str(&goal_json)
        .map_err(|e| AppError::bad_request(&format!("Invalid goal JSON: {}", e)))?;
    let transactions = parse_transactions(file_data.as_slice())
        .map_err(|e| AppError::bad_request(&format!("Invalid transaction CSV: {}", e)))?;

    info!(
        transactions = transactions.len(),
        "Running forecast analysis"
    );

    match state.engine.analyze(&transactions, &goal).await {
        Ok(result) => Ok(Json(result)),
        // An unresolvable goal is the caller's problem, not ours
        Err(e @ Error::GoalResolution(_)) => Err(AppError::bad_request(&e.to_string())),
        Err(e) => Err(e.into()),
    }
}
