//! Advice generation: companion prompt -> text generation -> translation back to the
//! user's language.
//!
//! Generation never fails from the caller's point of view: vendor problems turn into one of
//! the fixed degraded messages below, which the translator leaves in English.

use crate::error::VoiceError;
use crate::language::LanguageCode;
use crate::prompts::companion_prompt;
use crate::translate::CachedTranslator;
use crate::vendor::{GenerationReply, GenerationRequest, TextGenerator, GENERATION_PROVIDER};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const MAX_TEXT_CHARS: usize = 5000;
pub const GENERATION_TEMPERATURE: f32 = 0.8;
pub const GENERATION_MAX_TOKENS: u32 = 800;

/// Provider answered but reported a failure.
pub const PROVIDER_ERROR_MESSAGE: &str =
    "Yo, something went wrong on our end. Let's try that again, fr fr.";
/// Response had no block for the provider we asked.
pub const UNEXPECTED_RESPONSE_MESSAGE: &str =
    "Couldn't connect right now. Let's try again in a sec.";
/// Transport failure or non-2xx status.
pub const CONNECTION_ERROR_MESSAGE: &str = "Hey, having some tech issues. Give it another shot?";
/// Provider succeeded without returning text.
pub const EMPTY_GENERATION_MESSAGE: &str = "Unable to generate advice.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub message: String,
}

impl ValidationOutcome {
    fn ok() -> Self {
        Self {
            valid: true,
            message: "Valid".to_string(),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceSuccess {
    pub success: bool,
    pub original_text: String,
    pub english_advice: String,
    pub target_language: String,
    pub translated_advice: String,
    pub voice_ready: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceFailure {
    pub success: bool,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// Structured result of `get_advice`; serializes flat with a `success` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdviceResult {
    Success(AdviceSuccess),
    Failure(AdviceFailure),
}

impl AdviceResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AdviceResult::Success(_))
    }
}

fn default_language() -> String {
    "en".to_string()
}

/// One item of a batch request.
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl AdviceRequest {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}

pub struct AdviceGenerator {
    generator: Arc<dyn TextGenerator>,
    translator: Arc<CachedTranslator>,
}

impl AdviceGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, translator: Arc<CachedTranslator>) -> Self {
        Self {
            generator,
            translator,
        }
    }

    pub fn translator(&self) -> &Arc<CachedTranslator> {
        &self.translator
    }

    /// English advice for `situation`, or one of the degraded messages.
    pub async fn generate_advice(&self, situation: &str) -> String {
        let request = GenerationRequest {
            providers: GENERATION_PROVIDER.to_string(),
            text: companion_prompt(situation),
            temperature: GENERATION_TEMPERATURE,
            max_tokens: GENERATION_MAX_TOKENS,
        };

        tracing::info!(target: "selah::advice", situation = %preview(situation), "Generating advice");
        match self.generator.generate(&request).await {
            Ok(GenerationReply::Generated(Some(text))) => {
                tracing::info!(target: "selah::advice", chars = text.chars().count(), "Advice generated");
                text
            }
            Ok(GenerationReply::Generated(None)) => {
                tracing::warn!(target: "selah::advice", "Provider succeeded without generated text");
                EMPTY_GENERATION_MESSAGE.to_string()
            }
            Ok(GenerationReply::ProviderFailed(detail)) => {
                tracing::error!(target: "selah::advice", %detail, "Provider error");
                PROVIDER_ERROR_MESSAGE.to_string()
            }
            Err(VoiceError::UnrecognizedResponse(detail)) => {
                tracing::error!(target: "selah::advice", %detail, "Unexpected response format");
                UNEXPECTED_RESPONSE_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::error!(target: "selah::advice", error = %e, "Error generating advice");
                CONNECTION_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Check text and language before any vendor call. Lengths count characters.
    pub fn validate_input(&self, text: &str, language: &str) -> ValidationOutcome {
        if text.trim().is_empty() {
            return ValidationOutcome::rejected("Text cannot be empty");
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return ValidationOutcome::rejected(format!(
                "Text exceeds maximum length of {} characters",
                MAX_TEXT_CHARS
            ));
        }
        match language.parse::<LanguageCode>() {
            Ok(_) => ValidationOutcome::ok(),
            Err(VoiceError::Validation(message)) => ValidationOutcome::rejected(message),
            Err(other) => ValidationOutcome::rejected(other.to_string()),
        }
    }

    /// Validate, generate in English, translate when needed.
    pub async fn get_advice(&self, text: &str, language: &str) -> AdviceResult {
        let outcome = self.validate_input(text, language);
        let target = match (outcome.valid, language.parse::<LanguageCode>()) {
            (true, Ok(target)) => target,
            _ => {
                tracing::warn!(target: "selah::advice", message = %outcome.message, "Validation failed");
                return AdviceResult::Failure(AdviceFailure {
                    success: false,
                    error: outcome.message,
                    timestamp: Utc::now(),
                });
            }
        };

        tracing::info!(target: "selah::advice", language = %target, "Processing advice request");
        let english_advice = self.generate_advice(text).await;
        let translated_advice = self.translator.translate(&english_advice, target).await;

        AdviceResult::Success(AdviceSuccess {
            success: true,
            original_text: text.to_string(),
            english_advice,
            target_language: language.to_string(),
            translated_advice,
            voice_ready: true,
            timestamp: Utc::now(),
        })
    }

    /// Sequential; one bad item yields a failure entry without affecting the rest.
    pub async fn batch_process(&self, requests: &[AdviceRequest]) -> Vec<AdviceResult> {
        tracing::info!(target: "selah::advice", count = requests.len(), "Processing batch");
        let mut results = Vec::with_capacity(requests.len());
        for req in requests {
            results.push(self.get_advice(&req.text, &req.language).await);
        }
        results
    }

    pub fn supported_languages(&self) -> Vec<&'static str> {
        LanguageCode::ALL.iter().map(|l| l.as_str()).collect()
    }

    pub fn clear_cache(&self) -> usize {
        self.translator.clear_cache()
    }
}
