pub mod image_client;

use crate::{error::Result, models::GeneratedImage};
use async_trait::async_trait;

pub use image_client::ImageClient;

/// Anything that can turn a prompt into one generated image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn submit(&self, prompt: &str) -> Result<GeneratedImage>;
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn submit(&self, prompt: &str) -> Result<GeneratedImage> {
        ImageClient::submit(self, prompt).await
    }
}
