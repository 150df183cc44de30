//! Content retrieval and document upload endpoints.

use axum::extract::{Json, Multipart, State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use gwydion_content::{MediaKind, extract_text};

use crate::error::{ApiError, ErrorBody, Result};
use crate::state::AppState;

/// Body for the Wikipedia lookup endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RetrieveContentRequest {
    /// Page title to look up; defaults to the empty title.
    #[serde(default)]
    pub subtopic: Option<String>,
}

/// Summary text for the requested subtopic.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContentResponse {
    pub content: String,
}

/// Text extracted from an uploaded document.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExtractResponse {
    pub text: String,
}

/// Fetch the Wikipedia summary for a subtopic.
#[utoipa::path(
    post,
    path = "/api/retrieve-content",
    request_body = RetrieveContentRequest,
    responses(
        (status = 200, description = "Summary found", body = ContentResponse),
        (status = 404, description = "Subtopic not found on Wikipedia", body = ErrorBody),
        (status = 502, description = "Wikipedia unreachable or failing", body = ErrorBody),
    ),
    tag = "content"
)]
pub async fn retrieve_content_handler(
    State(state): State<AppState>,
    body: Option<Json<RetrieveContentRequest>>,
) -> Result<Json<ContentResponse>> {
    let subtopic = body
        .and_then(|Json(request)| request.subtopic)
        .unwrap_or_default();

    let content = state.wiki.page_summary(&subtopic).await?;

    Ok(Json(ContentResponse { content }))
}

/// Extract text from an uploaded file.
///
/// The part's declared content type selects the extractor. Only plain-text
/// uploads are decoded; the binary document classes are rejected with the
/// same error as an unknown type.
#[utoipa::path(
    post,
    path = "/api/upload-file",
    request_body(content = String, content_type = "multipart/form-data",
        description = "Form with a single `file` part"),
    responses(
        (status = 200, description = "Text extracted", body = ExtractResponse),
        (status = 400, description = "Unsupported file type or no file part", body = ErrorBody),
    ),
    tag = "content"
)]
pub async fn upload_file_handler(mut multipart: Multipart) -> Result<Json<ExtractResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read upload: {}", e)))?;

        let kind = MediaKind::classify(&content_type)
            .ok_or_else(|| ApiError::InvalidRequest("Unsupported file type".to_string()))?;
        let text = extract_text(kind, &bytes)?;

        tracing::debug!(
            content_type = %content_type,
            bytes = bytes.len(),
            "Upload extracted"
        );
        return Ok(Json(ExtractResponse { text }));
    }

    Err(ApiError::InvalidRequest("No file provided".to_string()))
}
