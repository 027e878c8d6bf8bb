//! Voice round trip: audio -> transcript -> English -> advice -> user's language -> speech.
//!
//! `handle` is the boundary for the inbound operation: every error becomes `{error}`.

use crate::advice::{AdviceGenerator, AdviceResult};
use crate::audio::{AudioClip, AudioPipeline};
use crate::cache::TranslationCache;
use crate::config::SelahConfig;
use crate::error::{VoiceError, VoiceResult};
use crate::poll::PollSettings;
use crate::translate::CachedTranslator;
use crate::vendor::EdenClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceAnswer {
    #[serde(rename = "answerUrl")]
    pub answer_url: String,
    /// Advice text in the clip's language.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoiceReply {
    Answer(VoiceAnswer),
    Error { error: String },
}

impl From<VoiceResult<VoiceAnswer>> for VoiceReply {
    fn from(result: VoiceResult<VoiceAnswer>) -> Self {
        match result {
            Ok(answer) => VoiceReply::Answer(answer),
            Err(e) => VoiceReply::Error {
                error: e.to_string(),
            },
        }
    }
}

pub struct VoicePipeline {
    audio: AudioPipeline,
    advisor: AdviceGenerator,
}

impl VoicePipeline {
    pub fn new(audio: AudioPipeline, advisor: AdviceGenerator) -> Self {
        Self { audio, advisor }
    }

    /// Wire every stage to one vendor client and a process-wide translation cache.
    pub fn from_config(config: &SelahConfig) -> VoiceResult<Self> {
        let client = Arc::new(EdenClient::from_config(config)?);
        let cache = Arc::new(TranslationCache::from_config(&config.translation_cache));
        let translator = Arc::new(CachedTranslator::new(client.clone(), cache));

        let audio = AudioPipeline::new(
            client.clone(),
            client.clone(),
            client.clone(),
            client.clone(),
            PollSettings::from(&config.poll),
        );
        let advisor = AdviceGenerator::new(client, translator);
        Ok(Self::new(audio, advisor))
    }

    pub fn audio(&self) -> &AudioPipeline {
        &self.audio
    }

    pub fn advisor(&self) -> &AdviceGenerator {
        &self.advisor
    }

    /// Run every stage in order. Translation to English and generation degrade in place;
    /// transcription, validation and speech failures abort.
    pub async fn respond(&self, clip: &AudioClip) -> VoiceResult<VoiceAnswer> {
        let transcript = self.audio.speech_to_text(clip).await?;

        let translated = self.audio.translate_text(&transcript, clip.language).await;
        let english = match translated {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(target: "selah::pipeline", error = %e, "Translation to English failed, using transcript");
                transcript
            }
        };

        let advice = match self.advisor.get_advice(&english, clip.language.as_str()).await {
            AdviceResult::Success(s) => s,
            AdviceResult::Failure(f) => return Err(VoiceError::Validation(f.error)),
        };

        let answer_url = self
            .audio
            .text_to_speech(&advice.translated_advice, clip.language)
            .await?;

        tracing::info!(target: "selah::pipeline", language = %clip.language, "Voice answer ready");
        Ok(VoiceAnswer {
            answer_url,
            text: advice.translated_advice,
        })
    }

    pub async fn handle(&self, clip: &AudioClip) -> VoiceReply {
        let result = self.respond(clip).await;
        if let Err(e) = &result {
            tracing::error!(target: "selah::pipeline", error = %e, "Voice request failed");
        }
        VoiceReply::from(result)
    }
}
