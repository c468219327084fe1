use crate::dtos::{AskRequest, AskResponse};
use crate::services::metrics;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

/// `POST /ask`: answer the question and return the refreshed summary.
#[tracing::instrument(skip(state, payload))]
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let result = answer_request(&state, payload).await;

    match &result {
        Ok(_) => metrics::record_ask_request("ok"),
        Err(e) => metrics::record_ask_request(e.status_code().as_str()),
    }

    result
}

async fn answer_request(
    state: &AppState,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| reject_payload(state, rejection))?;
    request.validate()?;

    if !request.page_html.is_empty() {
        tracing::debug!(
            page_html_len = request.page_html.len(),
            "Ignoring pageHtml, prompts use pageContent"
        );
    }

    let answer = state.answer_service.answer(&request).await?;

    Ok(Json(AskResponse {
        answer: answer.answer,
        summary: answer.summary,
    }))
}

fn reject_payload(state: &AppState, rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "request body exceeds {} bytes",
            state.config.request.max_body_bytes
        ))
    } else {
        AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
    }
}
