//! # Selah Core - Voice Companion Pipeline
//!
//! Turns a spoken question into a spoken, devotional answer by chaining four hosted
//! vendor calls. Each request runs its stages strictly in order; the translation cache is
//! the only state shared between requests.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          VoicePipeline                           │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────────┐  │
//! │  │ AudioPipeline│ → │  translate   │ → │   AdviceGenerator    │  │
//! │  │ STT + poll   │   │  src -> en   │   │ prompt -> generation │  │
//! │  └──────────────┘   └──────────────┘   └──────────────────────┘  │
//! │                                                   ↓              │
//! │  ┌──────────────┐                      ┌──────────────────────┐  │
//! │  │ text-to-     │ ←─────────────────── │  CachedTranslator    │  │
//! │  │ speech (URL) │                      │  en -> user language │  │
//! │  └──────────────┘                      └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod advice;
pub mod audio;
pub mod cache;
pub mod config;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod poll;
pub mod prompts;
pub mod translate;
pub mod vendor;

pub use advice::{AdviceGenerator, AdviceRequest, AdviceResult, ValidationOutcome};
pub use audio::{AudioClip, AudioPipeline};
pub use cache::{Clock, ManualClock, SystemClock, TranslationCache};
pub use config::SelahConfig;
pub use error::{VoiceError, VoiceResult};
pub use language::LanguageCode;
pub use pipeline::{VoiceAnswer, VoicePipeline, VoiceReply};
pub use poll::{poll_until, JobMonitor, PollOutcome, PollSettings};
pub use translate::CachedTranslator;
pub use vendor::EdenClient;
