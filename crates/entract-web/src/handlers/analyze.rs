use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use entract_core::ExtractError;

use crate::models::{ErrorResponse, KeywordsResponse, MessageResponse};
use crate::state::AppState;
use crate::upload;

/// `POST /analyze` — extract text from the uploaded document and return the
/// entity tokens the model recognizes in it.
pub async fn analyze(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let file = match upload::parse_multipart(multipart).await {
        Ok(file) => file,
        Err(message) => return error(StatusCode::BAD_REQUEST, message),
    };
    if file.data.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Empty file");
    }

    tracing::info!(
        filename = %file.filename,
        kind = ?file.kind,
        bytes = file.data.len(),
        "analyzing upload"
    );

    // MuPDF and tesseract block; keep them off the async runtime.
    let extractor = state.extractor.clone();
    let kind = file.kind;
    let data = file.data;
    let extracted =
        match tokio::task::spawn_blocking(move || extractor.extract(&data, kind)).await {
            Ok(result) => result,
            Err(e) => {
                return error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("extraction task failed: {e}"),
                );
            }
        };

    let text = match extracted {
        Ok(text) => text,
        Err(ExtractError::NoText) => {
            return error(
                StatusCode::UNPROCESSABLE_ENTITY,
                ExtractError::NoText.to_string(),
            );
        }
        Err(err @ (ExtractError::Pdf(_) | ExtractError::Ocr(_))) => {
            return error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
        }
    };

    // The pipeline returns empty text files as-is; emptiness is checked here.
    if text.trim().is_empty() {
        return error(StatusCode::BAD_REQUEST, "No text extracted from the file");
    }

    let entities = match state.recognizer.recognize(&text).await {
        Ok(entities) => entities,
        Err(e) => return error(StatusCode::BAD_GATEWAY, e.to_string()),
    };

    if entities.is_empty() {
        return (
            StatusCode::OK,
            Json(MessageResponse {
                message: "No named entities found".to_string(),
            }),
        )
            .into_response();
    }

    let keywords = entities.into_iter().map(|e| e.text).collect();
    Json(KeywordsResponse { keywords }).into_response()
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
