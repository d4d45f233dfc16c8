//! Media upload route handler.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::instrument;

use crate::media::{MediaError, UploadedMedia};
use crate::middleware::RequireSeller;
use crate::state::AppState;

/// JSON error body for failed uploads.
#[derive(Debug, Serialize)]
pub struct UploadError {
    pub message: String,
}

/// Multipart image upload: `file` plus optional `folder`.
///
/// Returns `{url, public_id}` on success; the caller stores both and uses
/// `public_id` for any later delete.
#[instrument(skip(_seller, state, multipart))]
pub async fn upload(
    RequireSeller(_seller): RequireSeller,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut folder: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(UploadError {
                        message: format!("Malformed upload: {e}"),
                    }),
                )
                    .into_response();
            }
        };

        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_owned();
                let content_type = field.content_type().unwrap_or("").to_owned();
                match field.bytes().await {
                    Ok(bytes) => file = Some((bytes.to_vec(), filename, content_type)),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(UploadError {
                                message: format!("Failed to read file: {e}"),
                            }),
                        )
                            .into_response();
                    }
                }
            }
            Some("folder") => {
                folder = field.text().await.ok();
            }
            _ => {}
        }
    }

    let Some((bytes, filename, content_type)) = file else {
        return (
            StatusCode::BAD_REQUEST,
            Json(UploadError {
                message: "Missing file field".to_string(),
            }),
        )
            .into_response();
    };

    let media = state.media();
    let folder = folder.unwrap_or_else(|| media.default_folder().to_owned());

    match media.upload(bytes, &filename, &content_type, &folder).await {
        Ok(uploaded) => (StatusCode::OK, Json::<UploadedMedia>(uploaded)).into_response(),
        Err(e @ (MediaError::UnsupportedType(_) | MediaError::TooLarge { .. })) => (
            StatusCode::BAD_REQUEST,
            Json(UploadError {
                message: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Upload failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(UploadError {
                    message: "Upload failed. Please try again.".to_string(),
                }),
            )
                .into_response()
        }
    }
}
