//! Voice upload endpoints. Always HTTP 200: failures are reported as `{"error": ...}`.

use crate::state::AppState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use selah_core::{AudioClip, LanguageCode, VoiceReply};
use serde::{Deserialize, Serialize};

pub const VOICE_FIELD: &str = "voice";

#[derive(Debug, Default, Deserialize)]
pub struct VoiceQuery {
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Serialize)]
pub struct LanguageBody {
    pub language: String,
}

/// Bytes of the `voice` file field; other fields are skipped.
async fn read_voice_field(multipart: &mut Multipart) -> Result<Vec<u8>, String> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(VOICE_FIELD) => {
                tracing::debug!(
                    filename = field.file_name().unwrap_or("unknown"),
                    content_type = field.content_type().unwrap_or("application/octet-stream"),
                    "Voice upload received"
                );
                return field
                    .bytes()
                    .await
                    .map(|b| b.to_vec())
                    .map_err(|e| format!("Failed to read file: {}", e));
            }
            Ok(Some(_)) => continue,
            Ok(None) => return Err(format!("Missing '{}' file field", VOICE_FIELD)),
            Err(e) => return Err(format!("Failed to read multipart: {}", e)),
        }
    }
}

fn resolve_language(state: &AppState, query: &VoiceQuery) -> Result<LanguageCode, String> {
    match query.language.as_deref() {
        Some(code) => code.parse().map_err(|e: selah_core::VoiceError| e.to_string()),
        None => Ok(state.source_language),
    }
}

fn error_reply(error: impl Into<String>) -> Response {
    Json(VoiceReply::Error {
        error: error.into(),
    })
    .into_response()
}

/// POST /voice: spoken question in, `{answerUrl, text}` out.
///
/// Extractor rejections are taken as values so a malformed request still gets `{error}`.
pub async fn voice_handler(
    State(state): State<AppState>,
    query: Result<Query<VoiceQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected voice query");
            return error_reply(rejection.body_text());
        }
    };
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected voice upload");
            return error_reply(rejection.body_text());
        }
    };
    let language = match resolve_language(&state, &query) {
        Ok(l) => l,
        Err(error) => return error_reply(error),
    };
    let bytes = match read_voice_field(&mut multipart).await {
        Ok(b) => b,
        Err(error) => {
            tracing::warn!(%error, "Rejected voice upload");
            return error_reply(error);
        }
    };

    let clip = AudioClip::new(bytes, language);
    Json(state.pipeline.handle(&clip).await).into_response()
}

/// POST /voice/language: display name of the spoken language.
pub async fn language_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => return error_reply(rejection.body_text()),
    };
    let bytes = match read_voice_field(&mut multipart).await {
        Ok(b) => b,
        Err(error) => return error_reply(error),
    };

    let clip = AudioClip::new(bytes, state.source_language);
    match state.pipeline.audio().detect_language(&clip).await {
        Ok(language) => Json(LanguageBody { language }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Language detection failed");
            error_reply(e.to_string())
        }
    }
}
