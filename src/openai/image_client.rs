use crate::{
    codec::ImageCodec,
    config::OpenAiConfig,
    error::{GenerationError, Result},
    logger,
    models::{GeneratedImage, GenerationRequest},
};
use reqwest::{header, Client};

const ERROR_BODY_LIMIT: usize = 512;

#[derive(Clone)]
pub struct ImageClient {
    http: Client,
    config: OpenAiConfig,
    codec: ImageCodec,
}

impl ImageClient {
    /// Fails with `ConfigError` if the credential or base URL is unusable.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        Self::with_http_client(config, Client::new())
    }

    pub fn with_http_client(config: OpenAiConfig, http: Client) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http,
            config,
            codec: ImageCodec::new(),
        })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    pub fn build_request(&self, prompt: &str) -> GenerationRequest {
        GenerationRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            size: self.config.size.clone(),
            quality: self.config.quality.clone(),
            n: 1,
            response_format: self.config.response_format,
        }
    }

    /// Issues exactly one generation call and decodes the first image.
    pub async fn submit(&self, prompt: &str) -> Result<GeneratedImage> {
        let request = self.build_request(prompt);
        let credential = self.config.credential()?;

        log::info!(
            "Generating image with model: {} ({}, {}, format={})",
            request.model,
            request.size,
            request.quality,
            request.response_format
        );
        let _timer = logger::timer("image generation");

        let response = self
            .http
            .post(self.config.endpoint())
            .bearer_auth(credential)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Image request failed: {}", e);
                GenerationError::NetworkError(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Image API returned {}", status);
            return Err(GenerationError::NetworkError(format!(
                "HTTP {}: {}",
                status,
                truncate(&body, ERROR_BODY_LIMIT)
            )));
        }

        let payload = response.bytes().await.map_err(|e| {
            GenerationError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        self.codec
            .decode(&payload, request.response_format)
            .map_err(|e| {
                log::error!("Unable to decode image response: {}", e);
                e
            })
    }
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResponseFormat;

    fn config() -> OpenAiConfig {
        OpenAiConfig::new().with_credential("sk-test")
    }

    #[test]
    fn test_build_request_uses_fixed_defaults() {
        let client = ImageClient::new(config()).unwrap();
        let request = client.build_request("a red fox in snow");
        assert_eq!(
            request,
            GenerationRequest {
                model: "dall-e-3".into(),
                prompt: "a red fox in snow".into(),
                size: "1024x1024".into(),
                quality: "standard".into(),
                n: 1,
                response_format: ResponseFormat::Url,
            }
        );
    }

    #[test]
    fn test_format_flows_into_request() {
        let client =
            ImageClient::new(config().with_response_format(ResponseFormat::Base64)).unwrap();
        assert_eq!(
            client.build_request("x").response_format,
            ResponseFormat::Base64
        );
    }

    #[test]
    fn test_empty_prompt_is_not_rejected_locally() {
        let client = ImageClient::new(config()).unwrap();
        assert_eq!(client.build_request("").prompt, "");
    }

    #[test]
    fn test_missing_credential_rejected_at_construction() {
        let result = ImageClient::new(OpenAiConfig::new());
        assert!(matches!(result, Err(GenerationError::ConfigError(_))));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("short", 512), "short");
    }
}
