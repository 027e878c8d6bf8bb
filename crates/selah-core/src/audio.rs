//! Audio pipeline: speech-to-text through the job monitor, source -> English translation,
//! text-to-speech and spoken-language detection.
//!
//! Unlike `CachedTranslator`, nothing here caches or degrades; errors go to the caller.

use crate::error::{VoiceError, VoiceResult};
use crate::language::LanguageCode;
use crate::poll::{JobMonitor, PollSettings};
use crate::vendor::{
    LanguageIdentifier, SpeechRequest, SpeechToText, TextToSpeech, TranslationRequest, Translator,
    DETECTION_STT_LANGUAGE, STT_PROVIDER, TRANSLATION_PROVIDER, TTS_PROVIDER, TTS_VOICE_OPTION,
};
use std::sync::Arc;

/// Uploaded audio (WAV assumed) and the language it was spoken in. Owned by one request.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub language: LanguageCode,
}

impl AudioClip {
    pub fn new(bytes: impl Into<Vec<u8>>, language: LanguageCode) -> Self {
        Self {
            bytes: bytes.into(),
            language,
        }
    }

    fn ensure_not_empty(&self) -> VoiceResult<()> {
        if self.bytes.is_empty() {
            return Err(VoiceError::Validation("Audio clip is empty".to_string()));
        }
        Ok(())
    }
}

pub struct AudioPipeline {
    stt: Arc<dyn SpeechToText>,
    translator: Arc<dyn Translator>,
    tts: Arc<dyn TextToSpeech>,
    identifier: Arc<dyn LanguageIdentifier>,
    monitor: JobMonitor,
}

impl AudioPipeline {
    pub fn new(
        stt: Arc<dyn SpeechToText>,
        translator: Arc<dyn Translator>,
        tts: Arc<dyn TextToSpeech>,
        identifier: Arc<dyn LanguageIdentifier>,
        poll: PollSettings,
    ) -> Self {
        let monitor = JobMonitor::new(Arc::clone(&stt), poll);
        Self {
            stt,
            translator,
            tts,
            identifier,
            monitor,
        }
    }

    async fn transcribe(&self, clip: &AudioClip, language_hint: &str) -> VoiceResult<String> {
        clip.ensure_not_empty()?;
        let job = self
            .stt
            .submit_transcription(&clip.bytes, STT_PROVIDER, language_hint)
            .await?;
        self.monitor.await_completion(&job).await
    }

    /// Transcript of `clip` in its declared language.
    pub async fn speech_to_text(&self, clip: &AudioClip) -> VoiceResult<String> {
        tracing::info!(target: "selah::audio", bytes = clip.bytes.len(), language = %clip.language, "Speech-to-text");
        let text = self.transcribe(clip, clip.language.as_str()).await?;
        tracing::info!(target: "selah::audio", chars = text.chars().count(), "Transcript ready");
        Ok(text)
    }

    /// Single uncached call from `source` to English.
    pub async fn translate_text(&self, transcript: &str, source: LanguageCode) -> VoiceResult<String> {
        if source.is_english() {
            return Ok(transcript.to_string());
        }
        let request = TranslationRequest {
            providers: TRANSLATION_PROVIDER.to_string(),
            source_language: source,
            target_language: LanguageCode::En,
            text: transcript.to_string(),
            fallback_providers: None,
        };
        tracing::debug!(target: "selah::audio", source = %source, "Translating transcript to English");
        self.translator.translate(&request).await
    }

    /// Hosted audio URL for `text` spoken in `language`. Failures propagate.
    pub async fn text_to_speech(&self, text: &str, language: LanguageCode) -> VoiceResult<String> {
        let request = SpeechRequest {
            providers: TTS_PROVIDER.to_string(),
            language,
            option: TTS_VOICE_OPTION.to_string(),
            text: text.to_string(),
        };
        tracing::info!(target: "selah::audio", language = %language, "Text-to-speech");
        self.tts.synthesize(&request).await
    }

    /// Display name of the language spoken in `clip` (e.g. "Amharic").
    ///
    /// The clip is transcribed with the `en-US` hint regardless of its declared language.
    pub async fn detect_language(&self, clip: &AudioClip) -> VoiceResult<String> {
        let text = self.transcribe(clip, DETECTION_STT_LANGUAGE).await?;
        let detected = self.identifier.identify_language(&text).await?;
        tracing::info!(target: "selah::audio", language = %detected.display_name, "Language detected");
        Ok(detected.display_name)
    }
}
