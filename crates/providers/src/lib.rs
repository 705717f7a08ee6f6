//! LLM provider implementations for sysward.
//!
//! One HTTP implementation covers every OpenAI-compatible endpoint
//! (Gemini's compatibility surface included). The reasoning loop only
//! sees the [`sysward_core::Provider`] trait, so stub providers used in
//! tests live next to the code that needs them.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
