//! Prompt-to-image generation against OpenAI-compatible image APIs.
//!
//! A [`GenerationSession`] drives one request at a time through an
//! [`ImageGenerator`] (normally [`ImageClient`]), decodes the returned image
//! with [`ImageCodec`], and appends each success to a [`HistoryStore`] that
//! survives process restarts.

pub mod codec;
pub mod config;
pub mod error;
pub mod history;
pub mod logger;
pub mod models;
pub mod openai;
pub mod session;
pub mod storage;

pub use codec::{decode_base64_image, ImageCodec};
pub use config::{Config, HistoryConfig, OpenAiConfig};
pub use error::{GenerationError, Result};
pub use history::HistoryStore;
pub use models::{
    GeneratedImage, GenerationRequest, HistoryEntry, HistoryLog, ImageData,
    ImageGenerationResponse, ResponseFormat,
};
pub use openai::{ImageClient, ImageGenerator};
pub use session::{GenerationSession, SessionState};
pub use storage::{FileSettingsStore, MemorySettingsStore, SettingsStore};
