use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use selah_core::{AdviceRequest, AdviceResult};
use serde::Serialize;

#[derive(Serialize)]
pub struct LanguagesBody {
    pub languages: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct ClearedBody {
    pub cleared: usize,
}

pub async fn advice_handler(
    State(state): State<AppState>,
    Json(req): Json<AdviceRequest>,
) -> Json<AdviceResult> {
    Json(state.pipeline.advisor().get_advice(&req.text, &req.language).await)
}

pub async fn batch_handler(
    State(state): State<AppState>,
    Json(reqs): Json<Vec<AdviceRequest>>,
) -> Json<Vec<AdviceResult>> {
    Json(state.pipeline.advisor().batch_process(&reqs).await)
}

pub async fn languages_handler(State(state): State<AppState>) -> Json<LanguagesBody> {
    Json(LanguagesBody {
        languages: state.pipeline.advisor().supported_languages(),
    })
}

pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearedBody> {
    Json(ClearedBody {
        cleared: state.pipeline.advisor().clear_cache(),
    })
}
