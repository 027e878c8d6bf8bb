//! Prompt templates for advice generation.

pub mod companion;

pub use companion::{
    companion_context, companion_prompt, COMPANION_CONTEXT_TEMPLATE, COMPANION_STRUCTURE,
    COMPANION_SYSTEM, COMPANION_VOICE_GUIDELINES,
};
