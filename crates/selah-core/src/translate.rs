//! English -> target-language translation with caching and graceful degradation.

use crate::cache::{CacheKey, TranslationCache};
use crate::language::LanguageCode;
use crate::vendor::{
    TranslationRequest, Translator, TRANSLATION_FALLBACK_PROVIDER, TRANSLATION_PROVIDER,
};
use std::sync::Arc;

/// Texts starting with these are our own degraded messages and stay in English.
pub const UNTRANSLATED_PREFIXES: [&str; 3] = ["Yo,", "Hey,", "Couldn't"];

pub struct CachedTranslator {
    backend: Arc<dyn Translator>,
    cache: Arc<TranslationCache>,
}

impl CachedTranslator {
    pub fn new(backend: Arc<dyn Translator>, cache: Arc<TranslationCache>) -> Self {
        Self { backend, cache }
    }

    /// Translate English `text` into `target`. Never fails: on vendor failure the
    /// original text comes back and nothing is cached.
    pub async fn translate(&self, text: &str, target: LanguageCode) -> String {
        if target.is_english() {
            return text.to_string();
        }
        if UNTRANSLATED_PREFIXES.iter().any(|p| text.starts_with(p)) {
            tracing::debug!(target: "selah::translate", "Skipping translation of degraded message");
            return text.to_string();
        }

        let key = CacheKey::new(text, target);
        if let Some(hit) = self.cache.get(&key) {
            tracing::info!(target: "selah::translate", target_language = %target, "Using cached translation");
            return hit;
        }

        let request = TranslationRequest {
            providers: TRANSLATION_PROVIDER.to_string(),
            source_language: LanguageCode::En,
            target_language: target,
            text: text.to_string(),
            fallback_providers: Some(TRANSLATION_FALLBACK_PROVIDER.to_string()),
        };
        tracing::info!(target: "selah::translate", target_language = %target, "Translating");
        match self.backend.translate(&request).await {
            Ok(translated) => {
                self.cache.insert(key, translated.clone());
                translated
            }
            Err(e) => {
                tracing::error!(target: "selah::translate", target_language = %target, error = %e, "Translation failed, returning original text");
                text.to_string()
            }
        }
    }

    pub fn clear_cache(&self) -> usize {
        let cleared = self.cache.clear();
        tracing::info!(target: "selah::translate", cleared, "Translation cache cleared");
        cleared
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
