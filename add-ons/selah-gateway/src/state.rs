use selah_core::{LanguageCode, SelahConfig, VoicePipeline};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SelahConfig>,
    pub pipeline: Arc<VoicePipeline>,
    /// Language assumed for uploads that do not name one.
    pub source_language: LanguageCode,
}

impl AppState {
    pub fn new(config: SelahConfig, pipeline: VoicePipeline) -> Result<Self, selah_core::VoiceError> {
        let source_language = config.source_language()?;
        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            source_language,
        })
    }
}
